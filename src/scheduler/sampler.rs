//! Random selection of documents from an eligibility pool.
//!
//! Sampling is kept apart from eligibility so that a different strategy
//! (weighted, load-balanced) can be plugged in without touching the
//! exclusion rules.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::model::DocumentId;

/// Strategy for drawing documents out of a pool.
pub trait PoolSampler {
    /// Draws `n` distinct documents from `pool`.
    ///
    /// Callers guarantee `n <= pool.len()`.
    fn sample(&self, pool: &BTreeSet<DocumentId>, n: usize) -> Vec<DocumentId>;
}

/// Uniform sampling without replacement.
///
/// Every subset of size `n` is equally likely. With a seed, each call starts
/// from the same RNG state, so identical pools give identical draws.
#[derive(Debug, Clone, Default)]
pub struct UniformSampler {
    /// Random seed for reproducibility (None = non-deterministic).
    seed: Option<u64>,
}

impl UniformSampler {
    /// Creates a non-deterministic sampler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn create_rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

impl PoolSampler for UniformSampler {
    fn sample(&self, pool: &BTreeSet<DocumentId>, n: usize) -> Vec<DocumentId> {
        let mut rng = self.create_rng();
        let mut candidates: Vec<DocumentId> = pool.iter().cloned().collect();
        candidates.shuffle(&mut rng);
        candidates.truncate(n);
        candidates
    }
}
