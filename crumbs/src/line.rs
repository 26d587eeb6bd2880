use heapless::Vec;

pub mod error {
    /// The line did not fit in the buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Overflow;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Error {
        Overflow,
        Utf8,
    }

    impl From<Overflow> for Error {
        fn from(_: Overflow) -> Self {
            Self::Overflow
        }
    }
}

/// Accumulates operator input one line at a time.
///
/// Bytes past the capacity are dropped until the end of the line, which
/// is then reported as an overflow. The next line starts clean, so an
/// overlong line never bleeds into the one after it.
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
    overflow: bool,
    complete: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflow: false,
            complete: false,
        }
    }

    /// Ingest incoming bytes up to and including the next `\n`.
    ///
    /// Returns how many bytes of `src` were consumed. Once a line is
    /// complete nothing more is taken until [`flush`](Self::flush).
    pub fn ingest(&mut self, src: &[u8]) -> usize {
        if self.complete {
            return 0;
        }

        for (i, &byte) in src.iter().enumerate() {
            if byte == b'\n' {
                self.complete = true;

                return i + 1;
            }

            if self.buf.push(byte).is_err() {
                self.overflow = true;
            }
        }

        src.len()
    }

    /// Treat the held bytes as a complete line,
    /// e.g. when the input has ended.
    #[inline]
    pub fn finish(&mut self) {
        self.complete = true;
    }

    /// Whether a line terminator has been seen.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The held line, without its terminator or a trailing `\r`.
    pub fn line(&self) -> Result<&str, error::Error> {
        if self.overflow {
            Err(error::Overflow)?;
        }

        let line = core::str::from_utf8(&self.buf).map_err(|_| error::Error::Utf8)?;

        Ok(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Drop the held line and start the next.
    #[inline]
    pub fn flush(&mut self) {
        self.buf.clear();
        self.overflow = false;
        self.complete = false;
    }

    /// Get the capacity (maximum length) of a line.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Get the number of bytes held.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
