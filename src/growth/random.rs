//! Bounded pseudo-random draws for branch generation
//!
//! Seeded mode replays a precomputed Park-Miller sequence so that the same
//! seed always produces the same tree; unseeded mode pulls from the
//! platform entropy source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TreeError;

/// Park-Miller modulus (2^31 - 1)
pub const LCG_MODULUS: i64 = 2_147_483_647;
/// Park-Miller multiplier (7^5)
pub const LCG_MULTIPLIER: i64 = 16_807;
/// Minimum number of values precomputed for a seed
pub const SEQUENCE_LEN: usize = 10_000;

/// Number of draws needed to generate a full tree of `full_depth` levels.
///
/// Every node draws its length and both child headings, leaves included.
pub fn draws_for_depth(full_depth: usize) -> usize {
    3 * ((1usize << full_depth) - 1)
}

/// Precomputed, replayable Park-Miller sequence normalised to `[0, 1)`
#[derive(Debug, Clone)]
pub struct SeededSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl SeededSequence {
    /// `seed` must already lie in `[1, LCG_MODULUS - 1]`.
    pub fn new(seed: i64, len: usize) -> Self {
        let mut state = seed;
        let values = (0..len)
            .map(|_| {
                state = (state * LCG_MULTIPLIER) % LCG_MODULUS;
                (state - 1) as f64 / (LCG_MODULUS - 1) as f64
            })
            .collect();

        Self { values, cursor: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn drawn(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn next_unit(&mut self) -> Result<f64, TreeError> {
        let value = self
            .values
            .get(self.cursor)
            .copied()
            .ok_or(TreeError::SequenceExhausted {
                drawn: self.cursor,
                capacity: self.values.len(),
            })?;
        self.cursor += 1;
        Ok(value)
    }
}

/// Source of `min + r * (max - min)` draws
#[derive(Debug, Clone)]
pub enum RandomSource {
    Seeded(SeededSequence),
    Entropy(StdRng),
}

impl RandomSource {
    /// Deterministic source holding enough values for a tree of `full_depth` levels
    pub fn seeded(seed: i64, full_depth: usize) -> Self {
        let len = SEQUENCE_LEN.max(draws_for_depth(full_depth));
        Self::Seeded(SeededSequence::new(seed, len))
    }

    pub fn entropy() -> Self {
        Self::Entropy(StdRng::from_entropy())
    }

    pub fn from_seed(seed: Option<i64>, full_depth: usize) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed, full_depth),
            None => Self::entropy(),
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Seeded(_))
    }

    /// Rewind the seeded cursor so the next tree replays the same draws
    pub fn reset(&mut self) {
        if let Self::Seeded(sequence) = self {
            sequence.rewind();
        }
    }

    pub fn next(&mut self, min: f64, max: f64) -> Result<f64, TreeError> {
        let unit = match self {
            Self::Seeded(sequence) => sequence.next_unit()?,
            Self::Entropy(rng) => rng.gen::<f64>(),
        };
        Ok(min + unit * (max - min))
    }
}
