// samplekv-data/src/iterators/thread_safe.rs

use parking_lot::{Mutex, MutexGuard};
use samplekv_core::Result;
use std::fmt;
use std::sync::Arc;

use super::traits::{next_or_stop, BatchSource};
use crate::batch::Batch;

/// Shares one batch iterator between threads.
///
/// [`next_batch`](ThreadSafeIterator::next_batch) holds a single lock for the
/// whole advance-and-fetch step, so cursor, epoch order and random source move
/// together and every batch is handed to exactly one caller. The lock is
/// released before the batch is returned, and also when the fetch fails or
/// panics; `parking_lot` mutexes are not poisoned by a panic.
pub struct ThreadSafeIterator<I> {
    inner: Mutex<I>,
    keys: Arc<[String]>,
    batch_size: usize,
    batches_per_epoch: Option<usize>,
}

impl<I: BatchSource> ThreadSafeIterator<I> {
    pub fn new(inner: I) -> Self {
        let keys = inner.keys().to_vec().into();
        let batch_size = inner.batch_size();
        let batches_per_epoch = inner.batches_per_epoch();
        Self {
            inner: Mutex::new(inner),
            keys,
            batch_size,
            batches_per_epoch,
        }
    }

    /// Produces the next batch under the lock.
    pub fn next_batch(&self) -> Result<Batch> {
        self.inner.lock().next_batch()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn batches_per_epoch(&self) -> Option<usize> {
        self.batches_per_epoch
    }

    /// Flag of the most recent batch handed out to any thread.
    ///
    /// Another thread may advance the iterator at any time; callers that need
    /// the flag of their own batch read [`Batch::end_of_dataset`].
    pub fn end_of_dataset(&self) -> bool {
        self.inner.lock().end_of_dataset()
    }

    /// Runs `f` with exclusive access to the wrapped iterator.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut I) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Locks the wrapped iterator until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, I> {
        self.inner.lock()
    }

    pub fn get_mut(&mut self) -> &mut I {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> I {
        self.inner.into_inner()
    }

    /// Converts into a shareable handle.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<I: BatchSource> BatchSource for ThreadSafeIterator<I> {
    fn next_batch(&mut self) -> Result<Batch> {
        self.inner.get_mut().next_batch()
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn end_of_dataset(&self) -> bool {
        ThreadSafeIterator::end_of_dataset(self)
    }

    fn batches_per_epoch(&self) -> Option<usize> {
        self.batches_per_epoch
    }
}

impl<I: BatchSource> Iterator for &ThreadSafeIterator<I> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(self.next_batch())
    }
}

impl<I: BatchSource> Iterator for ThreadSafeIterator<I> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(BatchSource::next_batch(self))
    }
}

impl<I> fmt::Debug for ThreadSafeIterator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSafeIterator")
            .field("keys", &self.keys)
            .field("batch_size", &self.batch_size)
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}

#[cfg(test)]
#[path = "thread_safe_test.rs"]
mod tests;
