//! In-memory digit source for engine tests.

use std::collections::VecDeque;

use crate::error::Result;
use crate::source::DigitSource;

pub struct MemorySource {
    batches: VecDeque<Vec<u8>>,
}

impl MemorySource {
    /// A source delivering all digits in one batch.
    pub fn new(digits: &str) -> Self {
        Self::batched(&[digits])
    }

    /// A source delivering one batch per slice entry.
    pub fn batched(batches: &[&str]) -> Self {
        Self {
            batches: batches.iter().map(|b| b.as_bytes().to_vec()).collect(),
        }
    }

    /// Batches not yet pulled; lets tests assert a scan stopped early.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl DigitSource for MemorySource {
    fn next_batch(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.batches.pop_front())
    }
}
