use core::fmt::Debug;

use embedded_hal_async::i2c::I2c;

/// Largest single read an [`I2cTransport`] buffers by default.
pub const READ_CAPACITY: usize = 32;

/// The addressed bus, as seen by the controller.
///
/// A request makes up to a given number of bytes available, which are
/// then drained one at a time. Bus setup, clocking and arbitration are
/// the implementer's concern.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error: Debug;

    /// Write `bytes` to the peripheral at `address` in one transaction.
    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Ask the peripheral at `address` for up to `len` bytes.
    ///
    /// Returns how many bytes were made available. Bytes left over
    /// from an earlier request are discarded.
    async fn request(&mut self, address: u8, len: usize) -> Result<usize, Self::Error>;

    /// Number of requested bytes not yet read.
    fn available(&self) -> usize;

    /// Take the next requested byte.
    fn read_byte(&mut self) -> Option<u8>;
}

/// [`Transport`] over an `embedded-hal-async` I2C bus.
///
/// A request performs the whole bus read up front and buffers up to
/// `N` bytes. Addresses go to the bus as given, with no masking to
/// 7 bits; rejecting one out of range is left to the HAL.
pub struct I2cTransport<I2C, const N: usize = READ_CAPACITY> {
    i2c: I2C,
    rx: [u8; N],
    filled: usize,
    cursor: usize,
}

impl<I2C, const N: usize> I2cTransport<I2C, N> {
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            rx: [0; N],
            filled: 0,
            cursor: 0,
        }
    }

    /// Give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c, const N: usize> Transport for I2cTransport<I2C, N> {
    type Error = I2C::Error;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes).await
    }

    async fn request(&mut self, address: u8, len: usize) -> Result<usize, Self::Error> {
        let len = len.min(N);

        self.filled = 0;
        self.cursor = 0;

        self.i2c.read(address, &mut self.rx[..len]).await?;
        self.filled = len;

        Ok(len)
    }

    #[inline]
    fn available(&self) -> usize {
        self.filled - self.cursor
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.rx[..self.filled].get(self.cursor).copied()?;
        self.cursor += 1;

        Some(byte)
    }
}
