// samplekv-data/src/batch.rs

use samplekv_core::{Array, Result, SampleKvError};
use std::sync::Arc;

/// One batch produced by a batch iterator.
///
/// Holds one array per requested key, in request order. Every array has the
/// number of samples in the batch as its leading dimension. The batch also
/// records the store indices it was built from and whether it completed an
/// epoch, so a consumer sharing an iterator with other threads reads the flag
/// of the batch it actually received.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    keys: Arc<[String]>,
    arrays: Vec<Array>,
    indices: Vec<usize>,
    end_of_dataset: bool,
}

impl Batch {
    pub(crate) fn new(
        keys: Arc<[String]>,
        arrays: Vec<Array>,
        indices: Vec<usize>,
        end_of_dataset: bool,
    ) -> Self {
        debug_assert_eq!(keys.len(), arrays.len());
        Self {
            keys,
            arrays,
            indices,
            end_of_dataset,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn arrays(&self) -> &[Array] {
        &self.arrays
    }

    /// Store indices of the samples, in batch order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True if this batch was the last one of its epoch. Always false for
    /// stochastic batches.
    pub fn end_of_dataset(&self) -> bool {
        self.end_of_dataset
    }

    pub fn get(&self, key: &str) -> Option<&Array> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| &self.arrays[i])
    }

    /// Like [`get`](Batch::get), failing with `UnknownKey`.
    pub fn field(&self, key: &str) -> Result<&Array> {
        self.get(key).ok_or_else(|| SampleKvError::unknown_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array)> {
        self.keys.iter().map(String::as_str).zip(self.arrays.iter())
    }

    pub fn into_arrays(self) -> Vec<Array> {
        self.arrays
    }

    /// Replaces field `key` with `f` applied to it.
    ///
    /// # Errors
    ///
    /// `UnknownKey` if the batch has no such field, `ShapeMismatch` if the
    /// result no longer has the batch length as its leading dimension, or
    /// whatever `f` returns.
    pub fn map_field<F>(mut self, key: &str, f: F) -> Result<Batch>
    where
        F: FnOnce(&Array) -> Result<Array>,
    {
        let slot = self
            .keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| SampleKvError::unknown_key(key))?;
        let mapped = f(&self.arrays[slot])?;
        if mapped.shape().first() != Some(&self.len()) {
            return Err(SampleKvError::ShapeMismatch {
                expected: vec![self.len()],
                actual: mapped.shape().to_vec(),
                operation: format!("Batch::map_field (key '{}')", key),
            });
        }
        self.arrays[slot] = mapped;
        Ok(self)
    }
}
