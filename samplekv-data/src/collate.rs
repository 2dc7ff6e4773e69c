// samplekv-data/src/collate.rs

//! Batch assembly: reads the requested keys for a set of sample indices and
//! stacks them along a new leading dimension.

use samplekv_core::ops::stack;
use samplekv_core::{Array, Result};

use crate::store::SampleStore;

/// Fetches every key for `indices` (in order) and stacks each key's samples.
///
/// Any failed read aborts the whole batch.
pub fn gather<S: SampleStore + ?Sized>(
    store: &S,
    keys: &[String],
    indices: &[usize],
) -> Result<Vec<Array>> {
    keys.iter()
        .map(|key| {
            let items = indices
                .iter()
                .map(|&index| store.fetch(key, index))
                .collect::<Result<Vec<_>>>()?;
            stack(&items)
        })
        .collect()
}

/// Fetches every key for the contiguous samples `[start, end)`.
pub fn gather_range<S: SampleStore + ?Sized>(
    store: &S,
    keys: &[String],
    start: usize,
    end: usize,
) -> Result<Vec<Array>> {
    keys.iter()
        .map(|key| store.fetch_range(key, start, end))
        .collect()
}
