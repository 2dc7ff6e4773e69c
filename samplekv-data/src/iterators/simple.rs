// samplekv-data/src/iterators/simple.rs

use log::{debug, trace};
use samplekv_core::Result;
use std::sync::Arc;

use super::resolve_keys;
use super::traits::{next_or_stop, BatchSource};
use crate::batch::Batch;
use crate::collate::gather;
use crate::cursor::Cursor;
use crate::samplers::{EpochOrder, RandomSource};
use crate::store::SampleStore;

/// Walks the store epoch by epoch in identity or shuffled order.
///
/// Batches cover consecutive positions of the epoch order; the last batch of
/// an epoch may be short and is the only one flagged `end_of_dataset`. A
/// shuffled iterator draws a fresh permutation at the start of each epoch.
#[derive(Debug)]
pub struct SimpleBatchIterator<S: SampleStore + ?Sized = dyn SampleStore> {
    store: Arc<S>,
    keys: Arc<[String]>,
    cursor: Cursor,
    order: EpochOrder,
    /// Epoch the current order was drawn for.
    order_epoch: Option<usize>,
}

impl<S: SampleStore + ?Sized> SimpleBatchIterator<S> {
    /// Creates an iterator visiting samples in storage order.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a zero `batch_size`, no keys, repeated keys or an
    /// empty store; `UnknownKey` for a key the store does not hold; `Closed`
    /// for a closed store.
    pub fn new<I, K>(store: Arc<S>, keys: I, batch_size: usize, endless: bool) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let order = EpochOrder::identity(store.len());
        Self::with_order(store, keys, batch_size, endless, order)
    }

    /// Creates an iterator that visits samples in a new random order every
    /// epoch, drawn from `rng`.
    pub fn shuffled<I, K>(
        store: Arc<S>,
        keys: I,
        batch_size: usize,
        endless: bool,
        rng: RandomSource,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let order = EpochOrder::shuffled(store.len(), rng);
        Self::with_order(store, keys, batch_size, endless, order)
    }

    fn with_order<I, K>(
        store: Arc<S>,
        keys: I,
        batch_size: usize,
        endless: bool,
        order: EpochOrder,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = resolve_keys(&*store, keys)?;
        let cursor = Cursor::new(store.len(), batch_size, endless)?;
        debug!(
            "SimpleBatchIterator: {} samples, keys {:?}, batch_size {}, shuffle {}, endless {}",
            store.len(),
            keys,
            batch_size,
            order.is_shuffled(),
            endless
        );
        Ok(Self {
            store,
            keys,
            cursor,
            order,
            order_epoch: None,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn is_shuffled(&self) -> bool {
        self.order.is_shuffled()
    }

    pub fn is_endless(&self) -> bool {
        self.cursor.is_endless()
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> usize {
        self.cursor.epoch()
    }

    /// Position of the next batch within the current epoch.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}

impl<S: SampleStore + ?Sized> BatchSource for SimpleBatchIterator<S> {
    fn next_batch(&mut self) -> Result<Batch> {
        let step = self.cursor.peek()?;
        let epoch = self.cursor.epoch();
        if step.starts_epoch() && self.order_epoch != Some(epoch) {
            debug!("SimpleBatchIterator: starting epoch {}", epoch);
            self.order.begin_epoch();
            self.order_epoch = Some(epoch);
        }

        let indices = self.order.indices(step.start, step.end);
        let arrays = gather(&*self.store, &self.keys, &indices)?;
        self.cursor.commit(step);

        trace!(
            "SimpleBatchIterator: batch [{}, {}) of epoch {}, end_of_dataset {}",
            step.start,
            step.end,
            epoch,
            step.end_of_dataset
        );
        Ok(Batch::new(
            self.keys.clone(),
            arrays,
            indices,
            step.end_of_dataset,
        ))
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn batch_size(&self) -> usize {
        self.cursor.batch_size()
    }

    fn end_of_dataset(&self) -> bool {
        self.cursor.end_of_dataset()
    }

    fn batches_per_epoch(&self) -> Option<usize> {
        Some(self.cursor.batches_per_epoch())
    }
}

impl<S: SampleStore + ?Sized> Iterator for SimpleBatchIterator<S> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(self.next_batch())
    }
}

#[cfg(test)]
#[path = "simple_test.rs"]
mod tests;
