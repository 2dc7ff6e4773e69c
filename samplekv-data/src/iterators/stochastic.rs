// samplekv-data/src/iterators/stochastic.rs

use log::{debug, trace};
use samplekv_core::{Result, SampleKvError};
use std::sync::Arc;

use super::resolve_keys;
use super::traits::{next_or_stop, BatchSource};
use crate::batch::Batch;
use crate::collate::gather;
use crate::samplers::{RandomSource, UniformSampler};
use crate::store::SampleStore;

/// Endless uniform sampling with replacement.
///
/// Each batch draws `batch_size` indices independently from
/// `[0, store.len())`. There are no epochs: `end_of_dataset` is always false
/// and the iterator never stops.
#[derive(Debug)]
pub struct StochasticBatchIterator<S: SampleStore + ?Sized = dyn SampleStore> {
    store: Arc<S>,
    keys: Arc<[String]>,
    batch_size: usize,
    sampler: UniformSampler,
    batches: u64,
}

impl<S: SampleStore + ?Sized> StochasticBatchIterator<S> {
    pub fn new<I, K>(store: Arc<S>, keys: I, batch_size: usize, rng: RandomSource) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        if batch_size == 0 {
            return Err(SampleKvError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        let keys = resolve_keys(&*store, keys)?;
        debug!(
            "StochasticBatchIterator: {} samples, keys {:?}, batch_size {}, seed {:?}",
            store.len(),
            keys,
            batch_size,
            rng.seed()
        );
        let sampler = UniformSampler::new(store.len(), rng);
        Ok(Self {
            store,
            keys,
            batch_size,
            sampler,
            batches: 0,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Number of batches produced so far.
    pub fn batches_drawn(&self) -> u64 {
        self.batches
    }
}

impl<S: SampleStore + ?Sized> BatchSource for StochasticBatchIterator<S> {
    fn next_batch(&mut self) -> Result<Batch> {
        let mut sampler = self.sampler.clone();
        let indices = sampler.draw(self.batch_size);
        let arrays = gather(&*self.store, &self.keys, &indices)?;
        self.sampler = sampler;
        self.batches += 1;

        trace!(
            "StochasticBatchIterator: batch #{} with {} indices",
            self.batches,
            indices.len()
        );
        Ok(Batch::new(self.keys.clone(), arrays, indices, false))
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn end_of_dataset(&self) -> bool {
        false
    }

    fn batches_per_epoch(&self) -> Option<usize> {
        None
    }
}

impl<S: SampleStore + ?Sized> Iterator for StochasticBatchIterator<S> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(self.next_batch())
    }
}
