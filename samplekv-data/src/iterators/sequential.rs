// samplekv-data/src/iterators/sequential.rs

use log::{debug, trace};
use samplekv_core::Result;
use std::sync::Arc;

use super::resolve_keys;
use super::traits::{next_or_stop, BatchSource};
use crate::batch::Batch;
use crate::collate::gather_range;
use crate::cursor::Cursor;
use crate::store::SampleStore;

/// Walks the store in storage order, reading each batch as one contiguous
/// range per key.
///
/// Produces the same batches as an unshuffled [`SimpleBatchIterator`], but
/// never materializes an order and lets the store serve each key with a
/// single [`fetch_range`](SampleStore::fetch_range).
///
/// [`SimpleBatchIterator`]: super::SimpleBatchIterator
#[derive(Debug)]
pub struct SequentialBatchIterator<S: SampleStore + ?Sized = dyn SampleStore> {
    store: Arc<S>,
    keys: Arc<[String]>,
    cursor: Cursor,
}

impl<S: SampleStore + ?Sized> SequentialBatchIterator<S> {
    pub fn new<I, K>(store: Arc<S>, keys: I, batch_size: usize, endless: bool) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = resolve_keys(&*store, keys)?;
        let cursor = Cursor::new(store.len(), batch_size, endless)?;
        debug!(
            "SequentialBatchIterator: {} samples, keys {:?}, batch_size {}, endless {}",
            store.len(),
            keys,
            batch_size,
            endless
        );
        Ok(Self {
            store,
            keys,
            cursor,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn is_endless(&self) -> bool {
        self.cursor.is_endless()
    }

    pub fn epoch(&self) -> usize {
        self.cursor.epoch()
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}

impl<S: SampleStore + ?Sized> BatchSource for SequentialBatchIterator<S> {
    fn next_batch(&mut self) -> Result<Batch> {
        let step = self.cursor.peek()?;
        if step.starts_epoch() {
            debug!("SequentialBatchIterator: starting epoch {}", self.cursor.epoch());
        }
        let arrays = gather_range(&*self.store, &self.keys, step.start, step.end)?;
        self.cursor.commit(step);

        trace!(
            "SequentialBatchIterator: batch [{}, {}), end_of_dataset {}",
            step.start,
            step.end,
            step.end_of_dataset
        );
        Ok(Batch::new(
            self.keys.clone(),
            arrays,
            (step.start..step.end).collect(),
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

impl<S: SampleStore + ?Sized> Iterator for SequentialBatchIterator<S> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(self.next_batch())
    }
}
