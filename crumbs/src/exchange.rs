//! Controller-initiated transactions.
//!
//! Each call is one independent transaction: nothing carries over
//! between calls, and a reply is simply whatever the peripheral makes
//! available after the request. That holds only on a bus with a single
//! controller, one transaction at a time.

use crumbs_wire::{error::Truncated, WireBuf};
use embedded_hal_async::delay::DelayNs;

use crate::{
    message::{Message, SIZE},
    transport::Transport,
};

/// Default wait between requesting a reply and reading it.
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 50;

/// Exchange tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Time a peripheral gets to prepare its reply.
    ///
    /// A timing heuristic, not part of the protocol.
    pub settle_delay_ms: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }

    pub const fn with_settle_delay_ms(mut self, settle_delay_ms: u32) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus reported a failure. Passed through untouched.
    Transport(E),
    /// The reply held fewer bytes than a message.
    Truncated(Truncated),
}

impl<E> From<Truncated> for Error<E> {
    fn from(value: Truncated) -> Self {
        Self::Truncated(value)
    }
}

/// Drives sends and requests over a [`Transport`].
pub struct Controller<T, D> {
    transport: T,
    delay: D,
    config: Config,
}

impl<T, D> Controller<T, D>
where
    T: Transport,
    D: DelayNs,
{
    pub const fn new(transport: T, delay: D) -> Self {
        Self::with_config(transport, delay, Config::new())
    }

    pub const fn with_config(transport: T, delay: D, config: Config) -> Self {
        Self {
            transport,
            delay,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Encode `message` and write it to `address`.
    ///
    /// No reply is read. A bus failure is returned as is, never retried.
    pub async fn send(&mut self, address: u8, message: &Message) -> Result<(), Error<T::Error>> {
        let frame = message.encode();

        debug!("send to {=u8:#x}", address);

        self.transport
            .write(address, &frame)
            .await
            .map_err(Error::Transport)
    }

    /// Request one message from `address`.
    ///
    /// Waits the settling delay after the request, then reads whatever
    /// is available, up to one message. A short reply is
    /// [`Error::Truncated`]. Exactly one read is attempted.
    pub async fn request(&mut self, address: u8) -> Result<Message, Error<T::Error>> {
        self.transport
            .request(address, SIZE)
            .await
            .map_err(Error::Transport)?;

        self.delay.delay_ms(self.config.settle_delay_ms).await;

        let mut buf = [0u8; SIZE];
        let mut collected = 0;

        for slot in buf.iter_mut() {
            if self.transport.available() == 0 {
                break;
            }

            match self.transport.read_byte() {
                Some(byte) => *slot = byte,
                None => break,
            }

            collected += 1;
        }

        trace!("read {=usize} bytes from {=u8:#x}", collected, address);

        let message = Message::decode(&buf[..collected]).inspect_err(|_| {
            warn!(
                "truncated reply from {=u8:#x}: {=usize} of {=usize} bytes",
                address,
                collected,
                SIZE
            )
        })?;

        Ok(message)
    }

    /// Give back the bus and the delay provider.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::{Delay, Echo, Nack};
    use embassy_futures::block_on;

    use super::*;

    fn sample() -> Message {
        Message {
            slice_id: 0,
            type_id: 1,
            command_type: 1,
            data: [75.0, 1.0, 0.0, 65.0, 2.0, 7.0],
            error_flags: 0,
        }
    }

    mod send {
        use super::*;

        #[test]
        fn writes_frame() {
            let mut controller = Controller::new(Echo::new(0x08), Delay::default());

            block_on(controller.send(0x08, &sample())).unwrap();

            let (echo, delay) = controller.release();

            assert_eq!(1, echo.writes);
            assert_eq!(sample().encode().as_slice(), echo.frame.as_slice());
            // sends never wait
            assert_eq!(0, delay.elapsed_ns);
        }

        #[test]
        fn transport_failure() {
            let mut controller = Controller::new(Echo::new(0x08), Delay::default());

            assert_eq!(
                Err(Error::Transport(Nack(0x09))),
                block_on(controller.send(0x09, &sample()))
            );
        }
    }

    mod request {
        use super::*;

        #[test]
        fn decodes_reply() {
            let echo = Echo::new(0x08).with_frame(&sample().encode());
            let mut controller = Controller::new(echo, Delay::default());

            assert_eq!(Ok(sample()), block_on(controller.request(0x08)));

            let (echo, delay) = controller.release();

            assert_eq!(1, echo.requests);
            assert_eq!(
                u64::from(DEFAULT_SETTLE_DELAY_MS) * 1_000_000,
                delay.elapsed_ns
            );
        }

        #[test]
        fn configured_delay() {
            let echo = Echo::new(0x08).with_frame(&sample().encode());
            let config = Config::new().with_settle_delay_ms(5);
            let mut controller = Controller::with_config(echo, Delay::default(), config);

            block_on(controller.request(0x08)).unwrap();

            assert_eq!(5_000_000, controller.release().1.elapsed_ns);
        }

        #[test]
        fn truncated() {
            let echo = Echo::new(0x08)
                .with_frame(&sample().encode())
                .with_limit(12);
            let mut controller = Controller::new(echo, Delay::default());

            assert_eq!(
                Err(Error::Truncated(Truncated {
                    expected: SIZE,
                    actual: 12
                })),
                block_on(controller.request(0x08))
            );

            // one attempt only
            assert_eq!(1, controller.release().0.requests);
        }

        #[test]
        fn silent_peripheral() {
            let mut controller = Controller::new(Echo::new(0x08), Delay::default());

            assert_eq!(
                Err(Error::Truncated(Truncated {
                    expected: SIZE,
                    actual: 0
                })),
                block_on(controller.request(0x08))
            );
        }

        #[test]
        fn transport_failure() {
            let mut controller = Controller::new(Echo::new(0x08), Delay::default());

            assert_eq!(
                Err(Error::Transport(Nack(0x21))),
                block_on(controller.request(0x21))
            );

            // no reply to wait for
            assert_eq!(0, controller.release().1.elapsed_ns);
        }

        #[test]
        fn independent_calls() {
            let echo = Echo::new(0x08).with_frame(&sample().encode());
            let mut controller = Controller::new(echo, Delay::default());

            let first = block_on(controller.request(0x08)).unwrap();

            let changed = Message {
                error_flags: 0x01,
                ..sample()
            };
            block_on(controller.send(0x08, &changed)).unwrap();

            let second = block_on(controller.request(0x08)).unwrap();

            assert_eq!(sample(), first);
            assert_eq!(changed, second);
        }
    }
}
