//! A fixed-width, fixed-order serialization layer for bus messages.
//!
//! Values are written field by field, in declaration order, with no
//! padding. Every multi-byte number is little-endian. Both ends of a
//! link must agree on this; nothing in a frame describes its own layout.

#![no_std]

pub mod medium;
mod primitives;

use medium::Medium;

// export proc macros
pub use crumbs_macros::{WireBuf, WireIter};

pub mod error {
    /// The byte source or sink ran out before
    /// the value was complete.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct EndOfInput;

    /// Fewer bytes were supplied than the
    /// wire size of the requested type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Truncated {
        pub expected: usize,
        pub actual: usize,
    }
}

/// Serialize and deserialize a type through
/// byte iterators.
///
/// Implementations must write and read exactly
/// `SIZE` bytes, in the same order both ways.
pub trait WireIter: Sized {
    /// Number of bytes the value occupies on the wire.
    const SIZE: usize;

    /// Write the value into the destination bytes.
    fn write_iter<'a>(
        &self,
        dst: impl IntoIterator<Item = &'a mut u8>,
    ) -> Result<(), error::EndOfInput>;

    /// Read a value from the source bytes.
    ///
    /// Every bit pattern is accepted, so the
    /// only failure is running out of input.
    fn read_iter<'a>(src: impl IntoIterator<Item = &'a u8>) -> Result<Self, error::EndOfInput>;
}

/// Serialize to and from a frame of exactly
/// the type's wire size.
///
/// # Safety
///
/// `Frame` must be at least `SIZE` bytes long.
/// `encode` skips the end-of-input check, so a
/// short frame *will* result in UB. Leave this
/// implementation to the derive macro.
pub unsafe trait WireBuf: WireIter {
    /// The serialized form of the implementer.
    type Frame: Medium;

    /// Serialize into a freshly zeroed frame.
    fn encode(&self) -> Self::Frame {
        let mut frame = <Self::Frame as Medium>::zeroed();

        // SAFETY: dependent on safety of trait implementation.
        // `Frame` must be of sufficient length.
        unsafe {
            self.write_iter(frame.as_mut().iter_mut())
                .unwrap_unchecked()
        };

        frame
    }

    /// Deserialize from the front of `src`.
    ///
    /// Bytes past the frame size are ignored.
    fn decode(src: &[u8]) -> Result<Self, error::Truncated> {
        let size = <Self::Frame as Medium>::SIZE;
        let truncated = error::Truncated {
            expected: size,
            actual: src.len(),
        };

        if src.len() < size {
            Err(truncated)?;
        }

        Self::read_iter(&src[..size]).map_err(|_| truncated)
    }
}
