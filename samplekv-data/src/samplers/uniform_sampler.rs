// samplekv-data/src/samplers/uniform_sampler.rs

use super::random_source::RandomSource;

/// Draws sample indices independently and uniformly, with replacement.
#[derive(Debug, Clone)]
pub struct UniformSampler {
    dataset_len: usize,
    rng: RandomSource,
}

impl UniformSampler {
    /// Creates a sampler over `[0, dataset_len)`. `dataset_len` must be non-zero.
    pub fn new(dataset_len: usize, rng: RandomSource) -> Self {
        debug_assert!(dataset_len > 0);
        UniformSampler { dataset_len, rng }
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    /// Draws `count` indices.
    pub fn draw(&mut self, count: usize) -> Vec<usize> {
        (0..count).map(|_| self.rng.index(self.dataset_len)).collect()
    }
}
