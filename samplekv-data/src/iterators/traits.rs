// samplekv-data/src/iterators/traits.rs

use samplekv_core::Result;

use super::mapped::MapBatches;
use super::thread_safe::ThreadSafeIterator;
use crate::batch::Batch;

/// The capability shared by every batch iterator: produce the next batch.
///
/// `next_batch` fails with `SampleKvError::StopIteration` once a non-endless
/// iterator has finished its epoch. The `Iterator` implementations of the
/// concrete types turn that signal into `None`.
pub trait BatchSource {
    /// Advances the iterator and returns the next batch.
    ///
    /// On error nothing is consumed: calling again retries the same batch.
    fn next_batch(&mut self) -> Result<Batch>;

    /// Requested keys, in output order.
    fn keys(&self) -> &[String];

    fn batch_size(&self) -> usize;

    /// Whether the most recent batch completed an epoch.
    fn end_of_dataset(&self) -> bool;

    /// Number of batches in one epoch, or `None` for iterators without
    /// epochs.
    fn batches_per_epoch(&self) -> Option<usize>;

    /// Post-processes every batch with `transform`.
    fn map_batches<F>(self, transform: F) -> MapBatches<Self, F>
    where
        Self: Sized,
        F: FnMut(Batch) -> Result<Batch>,
    {
        MapBatches::new(self, transform)
    }

    /// Wraps the iterator so several threads can share it.
    fn into_thread_safe(self) -> ThreadSafeIterator<Self>
    where
        Self: Sized,
    {
        ThreadSafeIterator::new(self)
    }
}

/// Maps the end-of-epoch signal to the end of an `Iterator`.
pub(crate) fn next_or_stop(result: Result<Batch>) -> Option<Result<Batch>> {
    match result {
        Err(e) if e.is_stop_iteration() => None,
        other => Some(other),
    }
}
