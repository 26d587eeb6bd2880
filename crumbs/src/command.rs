use crate::{
    message::Addressed,
    parser::{self, error::InsufficientFields},
};

/// Prefix of a line that asks a peripheral for its message.
pub const REQUEST_PREFIX: &str = "request=";

/// An operator line, classified.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Write the message to its address.
    Send(Addressed),
    /// Read one message back from the address.
    Request { address: u8 },
}

impl Command {
    /// Classify and parse one line of operator input.
    ///
    /// `request=<address>` (decimal or `0x` hex) selects a request;
    /// any other line goes through [`parser::parse`].
    pub fn parse(line: &str) -> Result<Self, InsufficientFields> {
        let line = line.trim();

        match line.strip_prefix(REQUEST_PREFIX) {
            Some(address) => Ok(Self::Request {
                address: parser::parse_address(address),
            }),
            None => parser::parse(line).map(Self::Send),
        }
    }
}
