//! Time-windowed accumulation of matches.

use crate::types::FileRecord;
use std::time::{Duration, Instant};

/// Buffer of matches awaiting delivery.
///
/// A batch is due once more than `interval` has passed since the previous
/// flush (or since the buffer was created) and the buffer is non-empty.
#[derive(Debug)]
pub struct BatchBuffer {
    records: Vec<FileRecord>,
    interval: Duration,
    last_flush: Instant,
    flushed: u64,
}

impl BatchBuffer {
    pub fn new(interval: Duration, started_at: Instant) -> Self {
        Self {
            records: Vec::new(),
            interval,
            last_flush: started_at,
            flushed: 0,
        }
    }

    pub fn push(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of batches taken so far.
    pub fn batches_flushed(&self) -> u64 {
        self.flushed
    }

    /// Take the buffer if the window has elapsed, restarting the window.
    pub fn take_if_due(&mut self, now: Instant) -> Option<Vec<FileRecord>> {
        if self.records.is_empty() || now.duration_since(self.last_flush) <= self.interval {
            return None;
        }
        self.last_flush = now;
        self.take()
    }

    /// Take whatever is left, regardless of the window.
    pub fn take_remaining(&mut self) -> Option<Vec<FileRecord>> {
        if self.records.is_empty() {
            return None;
        }
        self.take()
    }

    fn take(&mut self) -> Option<Vec<FileRecord>> {
        self.flushed += 1;
        Some(std::mem::take(&mut self.records))
    }
}
