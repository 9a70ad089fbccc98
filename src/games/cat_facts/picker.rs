//! Random fact selection behind an injectable seam.

use super::types::{Fact, FactBatch};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Chooses an index into a non-empty batch.
pub trait FactPicker: Send + std::fmt::Debug {
    /// Returns an index in `0..len`. Callers guarantee `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random picker.
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Creates a picker seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible picker.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FactPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Indices past the end of the batch wrap around.
#[derive(Debug, Clone)]
pub struct SequencePicker {
    indices: Vec<usize>,
    cursor: usize,
}

impl SequencePicker {
    /// Creates a picker that yields `indices` in order.
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, cursor: 0 }
    }
}

impl FactPicker for SequencePicker {
    fn pick(&mut self, len: usize) -> usize {
        let Some(&index) = self.indices.get(self.cursor % self.indices.len().max(1)) else {
            return 0;
        };
        self.cursor += 1;
        index % len
    }
}

/// Supplies facts to transitions that need a new one.
pub trait FactDealer {
    /// Returns the next fact, or `None` if there is nothing to draw from.
    fn deal(&mut self) -> Option<Fact>;
}

/// Draws from a batch using a picker.
#[derive(Debug)]
pub struct Dealer<'a> {
    batch: &'a FactBatch,
    picker: &'a mut dyn FactPicker,
}

impl<'a> Dealer<'a> {
    /// Creates a dealer over `batch`.
    pub fn new(batch: &'a FactBatch, picker: &'a mut dyn FactPicker) -> Self {
        Self { batch, picker }
    }
}

impl FactDealer for Dealer<'_> {
    fn deal(&mut self) -> Option<Fact> {
        if self.batch.is_empty() {
            return None;
        }
        let index = self.picker.pick(self.batch.len()).min(self.batch.len() - 1);
        debug!(index, batch_len = self.batch.len(), "Dealt fact");
        self.batch.get(index).cloned()
    }
}
