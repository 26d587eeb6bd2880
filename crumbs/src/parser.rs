//! Text grammar for building an addressed message.
//!
//! A line holds up to ten comma separated fields:
//!
//! ```text
//! address, type_id, command_type, data0, data1, data2, data3, data4, data5, error_flags
//! ```
//!
//! The first four are required. Missing trailing fields are zero and
//! anything past `error_flags` is ignored. Field text is coerced, never
//! rejected: see [`coerce_int`] and [`coerce_float`].

use crate::message::{Addressed, Message};

/// Fields that must be present for a line to parse.
pub const MIN_FIELDS: usize = 4;

/// Fields the grammar reads. Extra fields are ignored.
pub const MAX_FIELDS: usize = 10;

pub mod error {
    /// The line held fewer than
    /// [`MIN_FIELDS`](super::MIN_FIELDS) fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct InsufficientFields {
        pub found: usize,
    }
}

/// Parse a comma separated command line into an addressed message.
///
/// The `slice_id` is not part of the grammar and is always zero.
pub fn parse(line: &str) -> Result<Addressed, error::InsufficientFields> {
    let found = line.split(',').count();

    if found < MIN_FIELDS {
        Err(error::InsufficientFields { found })?;
    }

    let mut fields = line.split(',').take(MAX_FIELDS);
    let mut next = || fields.next().unwrap_or("");

    let address = coerce_int(next());

    let mut message = Message::zeroed();
    message.type_id = coerce_int(next());
    message.command_type = coerce_int(next());

    for slot in message.data.iter_mut() {
        *slot = coerce_float(next());
    }

    message.error_flags = coerce_int(next());

    Ok(Addressed { address, message })
}

/// Coerce text to an 8-bit field.
///
/// Leading whitespace and one sign are accepted, then decimal digits
/// are read until the first non-digit. Text without leading digits is
/// `0`. The value is truncated to its low 8 bits, so `300` becomes
/// `44` and `-1` becomes `255`.
pub fn coerce_int(text: &str) -> u8 {
    let text = text.trim_start();

    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(u32::from(digit - b'0'))
        });

    if negative {
        value.wrapping_neg() as u8
    } else {
        value as u8
    }
}

/// Coerce text to a payload float.
///
/// Leading whitespace is skipped, then the longest prefix of the form
/// `[+-]digits[.digits][(e|E)[+-]digits]` is parsed. Text without such a
/// prefix is `0.0`.
pub fn coerce_float(text: &str) -> f32 {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let whole = count_digits(&bytes[end..]);
    end += whole;

    let mut fraction = 0;

    if bytes.get(end) == Some(&b'.') {
        fraction = count_digits(&bytes[end + 1..]);
        end += 1 + fraction;
    }

    if whole + fraction == 0 {
        return 0.0;
    }

    // an exponent marker only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;

        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }

        let digits = count_digits(&bytes[exponent..]);

        if digits > 0 {
            end = exponent + digits;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

/// Coerce text to a bus address.
///
/// `0x` or `0X` selects hexadecimal, read up to the first non-hex
/// character. Anything else follows [`coerce_int`].
///
/// The result is not range checked: values above the 7-bit I2C range,
/// such as `0xff`, are handed to the transport unchanged.
pub fn parse_address(text: &str) -> u8 {
    let text = text.trim();

    match text.get(..2) {
        Some("0x" | "0X") => text[2..]
            .chars()
            .map_while(|c| c.to_digit(16))
            .fold(0u32, |acc, digit| acc.wrapping_mul(16).wrapping_add(digit))
            as u8,
        _ => coerce_int(text),
    }
}

#[inline]
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
