//! The operator command loop.
//!
//! Reads text lines from a serial port, turns each into a send or a
//! request, and echoes the result back on the same port. Failures are
//! reported and the loop carries on with the next line.

use embedded_hal_async::delay::DelayNs;
use embedded_io_async::{BufRead, Write};
use heapless::String;

use crate::{
    command::Command,
    exchange::{Controller, Error},
    line::{self, LineBuffer},
    message::{Addressed, Message},
    parser::error::InsufficientFields,
    transport::Transport,
};

/// Longest echo written back for one line, terminator included.
const REPORT_LEN: usize = 256;

const TERMINATOR: &str = "\r\n";

/// Why a line was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejection {
    Line(line::error::Error),
    Parse(InsufficientFields),
}

/// What became of one operator line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome<E> {
    Sent(Addressed),
    Received { address: u8, message: Message },
    Rejected(Rejection),
    Failed { address: u8, error: Error<E> },
}

/// Reads operator lines from `Port` and carries them out
/// through a [`Controller`].
///
/// Every non-blank line gets one echo, ending in `\r\n`.
/// Lines longer than `N` bytes are rejected whole.
pub struct Console<Port, T, D, const N: usize>
where
    Port: BufRead + Write,
    T: Transport,
    D: DelayNs,
{
    port: Port,
    controller: Controller<T, D>,
    line: LineBuffer<N>,
}

impl<Port, T, D, const N: usize> Console<Port, T, D, N>
where
    Port: BufRead + Write,
    T: Transport,
    D: DelayNs,
{
    pub const fn new(port: Port, controller: Controller<T, D>) -> Self {
        Self {
            port,
            controller,
            line: LineBuffer::new(),
        }
    }

    /// Read the next complete line into the line buffer.
    ///
    /// Returns `false` once the port has no more input.
    async fn fill_line(&mut self) -> Result<bool, Port::Error> {
        while !self.line.is_complete() {
            let buf = self.port.fill_buf().await?;

            if buf.is_empty() {
                if self.line.is_empty() {
                    return Ok(false);
                }

                self.line.finish();
                break;
            }

            let consumed = self.line.ingest(buf);
            self.port.consume(consumed);
        }

        Ok(true)
    }

    /// Handle one line of operator input.
    ///
    /// Blank lines are skipped. Returns `None` once the port has no
    /// more input.
    pub async fn poll(&mut self) -> Result<Option<Outcome<T::Error>>, Port::Error> {
        let command = loop {
            if !self.fill_line().await? {
                return Ok(None);
            }

            let command = match self.line.line() {
                Ok(text) if text.trim().is_empty() => None,
                Ok(text) => Some(Command::parse(text).map_err(Rejection::Parse)),
                Err(err) => Some(Err(Rejection::Line(err))),
            };

            self.line.flush();

            if let Some(command) = command {
                break command;
            }
        };

        let outcome = match command {
            Ok(Command::Send(addressed)) => {
                match self
                    .controller
                    .send(addressed.address, &addressed.message)
                    .await
                {
                    Ok(()) => Outcome::Sent(addressed),
                    Err(error) => Outcome::Failed {
                        address: addressed.address,
                        error,
                    },
                }
            }
            Ok(Command::Request { address }) => match self.controller.request(address).await {
                Ok(message) => Outcome::Received { address, message },
                Err(error) => Outcome::Failed { address, error },
            },
            Err(rejection) => {
                warn!("rejected line: {}", rejection);

                Outcome::Rejected(rejection)
            }
        };

        self.report(&outcome).await?;

        Ok(Some(outcome))
    }

    /// Handle lines until the port has no more input.
    pub async fn run(&mut self) -> Result<(), Port::Error> {
        while self.poll().await?.is_some() {}

        Ok(())
    }

    /// Give back the port and the controller.
    pub fn release(self) -> (Port, Controller<T, D>) {
        (self.port, self.controller)
    }

    async fn report(&mut self, outcome: &Outcome<T::Error>) -> Result<(), Port::Error> {
        let mut report = String::<{ REPORT_LEN - TERMINATOR.len() }>::new();

        // an echo cut short is still written, and still ends its line
        let _ = render(&mut report, outcome, N);

        self.port.write_all(report.as_bytes()).await?;
        self.port.write_all(TERMINATOR.as_bytes()).await?;
        self.port.flush().await
    }
}

fn render<E: core::fmt::Debug>(
    out: &mut impl core::fmt::Write,
    outcome: &Outcome<E>,
    capacity: usize,
) -> core::fmt::Result {
    match outcome {
        Outcome::Sent(Addressed { address, message }) => {
            write!(out, "sent to {address:#04x}: {message}")
        }
        Outcome::Received { address, message } => {
            write!(out, "received from {address:#04x}: {message}")
        }
        Outcome::Rejected(Rejection::Parse(InsufficientFields { found })) => write!(
            out,
            "rejected: expected at least {} fields, found {found}",
            crate::parser::MIN_FIELDS
        ),
        Outcome::Rejected(Rejection::Line(line::error::Error::Overflow)) => {
            write!(out, "rejected: line longer than {capacity} bytes")
        }
        Outcome::Rejected(Rejection::Line(line::error::Error::Utf8)) => {
            write!(out, "rejected: line is not valid UTF-8")
        }
        Outcome::Failed {
            address,
            error: Error::Transport(error),
        } => write!(out, "failed {address:#04x}: transport error {error:?}"),
        Outcome::Failed {
            address,
            error: Error::Truncated(truncated),
        } => write!(
            out,
            "failed {address:#04x}: truncated reply, {} of {} bytes",
            truncated.actual, truncated.expected
        ),
    }
}
