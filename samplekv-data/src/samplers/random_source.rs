// samplekv-data/src/samplers/random_source.rs

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// An explicit, caller-owned random generator.
///
/// Every iterator that needs randomness takes one of these by value, so two
/// iterators built from the same seed produce the same sequence of batches.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomSource {
    /// Creates a deterministic source from `seed`.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// The seed this source was created from, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Shuffles `items` in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Draws an index uniformly from `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Derives an independent source, advancing this one.
    pub fn fork(&mut self) -> RandomSource {
        let seed = self.rng.gen::<u64>();
        Self::seed_from_u64(seed)
    }
}
