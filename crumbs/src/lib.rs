//! Controller side of the CRUMBS bus protocol.
//!
//! A CRUMBS [`Message`] is a fixed 28 byte record. The controller builds
//! one from an operator's text line ([`parser`], [`command`]), writes it
//! to a peripheral, or asks a peripheral for one and decodes the reply
//! ([`exchange`]). The bus itself sits behind [`transport::Transport`].

#![no_std]

#[macro_use]
mod fmt;

pub mod command;
pub mod console;
pub mod exchange;
pub mod line;
pub mod message;
pub mod parser;
pub mod transport;

#[cfg(test)]
mod mock;

pub use message::{Addressed, Message};
