//! Test doubles for the bus and the delay provider.

use embedded_hal_async::delay::DelayNs;
use heapless::{Deque, Vec};

use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack(pub u8);

/// A single peripheral that answers every request
/// with the last frame written to it.
pub struct Echo {
    pub address: u8,
    pub frame: Vec<u8, 64>,
    /// Most bytes a request can make available.
    pub limit: usize,
    pub pending: Deque<u8, 64>,
    pub writes: usize,
    pub requests: usize,
}

impl Echo {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            frame: Vec::new(),
            limit: usize::MAX,
            pending: Deque::new(),
            writes: 0,
            requests: 0,
        }
    }

    /// Preload the frame returned by the next request.
    pub fn with_frame(mut self, frame: &[u8]) -> Self {
        self.frame.extend_from_slice(frame).unwrap();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Transport for Echo {
    type Error = Nack;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Nack> {
        if address != self.address {
            return Err(Nack(address));
        }

        self.writes += 1;
        self.frame.clear();
        self.frame.extend_from_slice(bytes).unwrap();

        Ok(())
    }

    async fn request(&mut self, address: u8, len: usize) -> Result<usize, Nack> {
        self.pending.clear();

        if address != self.address {
            return Err(Nack(address));
        }

        self.requests += 1;

        for &byte in self.frame.iter().take(len.min(self.limit)) {
            self.pending.push_back(byte).unwrap();
        }

        Ok(self.pending.len())
    }

    fn available(&self) -> usize {
        self.pending.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}

/// Records time spent waiting instead of waiting.
#[derive(Debug, Default)]
pub struct Delay {
    pub elapsed_ns: u64,
}

impl DelayNs for Delay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns += u64::from(ms) * 1_000_000;
    }
}
