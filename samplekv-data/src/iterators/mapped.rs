// samplekv-data/src/iterators/mapped.rs

use samplekv_core::Result;
use std::fmt;
use std::sync::Arc;

use super::thread_safe::ThreadSafeIterator;
use super::traits::{next_or_stop, BatchSource};
use crate::batch::Batch;

/// Applies a transform to every batch of a single-consumer iterator.
pub struct MapBatches<I, F> {
    inner: I,
    transform: F,
}

impl<I, F> MapBatches<I, F>
where
    I: BatchSource,
    F: FnMut(Batch) -> Result<Batch>,
{
    pub fn new(inner: I, transform: F) -> Self {
        Self { inner, transform }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I, F> BatchSource for MapBatches<I, F>
where
    I: BatchSource,
    F: FnMut(Batch) -> Result<Batch>,
{
    fn next_batch(&mut self) -> Result<Batch> {
        let batch = self.inner.next_batch()?;
        (self.transform)(batch)
    }

    fn keys(&self) -> &[String] {
        self.inner.keys()
    }

    fn batch_size(&self) -> usize {
        self.inner.batch_size()
    }

    fn end_of_dataset(&self) -> bool {
        self.inner.end_of_dataset()
    }

    fn batches_per_epoch(&self) -> Option<usize> {
        self.inner.batches_per_epoch()
    }
}

impl<I, F> Iterator for MapBatches<I, F>
where
    I: BatchSource,
    F: FnMut(Batch) -> Result<Batch>,
{
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(self.next_batch())
    }
}

impl<I: fmt::Debug, F> fmt::Debug for MapBatches<I, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapBatches")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Applies a transform to batches drawn from a shared [`ThreadSafeIterator`].
///
/// Each produced batch takes the base lock exactly once, around one
/// advance-and-fetch. The transform runs after the lock is released, so
/// threads transform their batches in parallel. Several `SharedMapBatches`
/// (and plain consumers) can share the same base.
pub struct SharedMapBatches<I, F> {
    base: Arc<ThreadSafeIterator<I>>,
    transform: F,
}

impl<I, F> SharedMapBatches<I, F>
where
    I: BatchSource,
    F: Fn(Batch) -> Result<Batch>,
{
    pub fn new(base: Arc<ThreadSafeIterator<I>>, transform: F) -> Self {
        Self { base, transform }
    }

    pub fn base(&self) -> &Arc<ThreadSafeIterator<I>> {
        &self.base
    }

    pub fn next_batch(&self) -> Result<Batch> {
        let batch = self.base.next_batch()?;
        (self.transform)(batch)
    }
}

impl<I, F> BatchSource for SharedMapBatches<I, F>
where
    I: BatchSource,
    F: Fn(Batch) -> Result<Batch>,
{
    fn next_batch(&mut self) -> Result<Batch> {
        (&*self).next_batch()
    }

    fn keys(&self) -> &[String] {
        self.base.keys()
    }

    fn batch_size(&self) -> usize {
        self.base.batch_size()
    }

    fn end_of_dataset(&self) -> bool {
        self.base.end_of_dataset()
    }

    fn batches_per_epoch(&self) -> Option<usize> {
        self.base.batches_per_epoch()
    }
}

impl<I, F> Iterator for &SharedMapBatches<I, F>
where
    I: BatchSource,
    F: Fn(Batch) -> Result<Batch>,
{
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop((*self).next_batch())
    }
}

impl<I, F> fmt::Debug for SharedMapBatches<I, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMapBatches")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
