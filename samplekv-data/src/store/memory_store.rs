use log::info;
use samplekv_core::{Array, Result, SampleKvError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use super::traits::{check_index, check_range, describe, FieldSpec, SampleStore};

/// A store holding every field as one in-memory array.
///
/// Each array's first dimension is the sample dimension; all arrays must
/// agree on its size. Fetching sample `i` of a field selects entry `i` along
/// that dimension.
#[derive(Debug)]
pub struct MemoryStore {
    fields: Vec<FieldSpec>,
    arrays: Vec<Array>,
    length: usize,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Creates a new `MemoryStore` from `(key, array)` columns.
    ///
    /// If `columns` is empty, the store has a length of 0.
    ///
    /// # Errors
    ///
    /// Returns `SampleKvError::RankMismatch` if any array is a scalar (rank 0).
    /// Returns `SampleKvError::ShapeMismatch` if arrays have inconsistent first dimension sizes.
    /// Returns `SampleKvError::InvalidConfig` if a key appears twice.
    pub fn new<K: Into<String>>(columns: Vec<(K, Array)>) -> Result<Self> {
        let mut columns: Vec<(String, Array)> =
            columns.into_iter().map(|(k, a)| (k.into(), a)).collect();
        columns.sort_by(|a, b| a.0.cmp(&b.0));

        let mut expected_len = None;
        for (i, (key, array)) in columns.iter().enumerate() {
            if i > 0 && columns[i - 1].0 == *key {
                return Err(SampleKvError::InvalidConfig(format!(
                    "duplicate key '{}'",
                    key
                )));
            }
            let shape = array.shape();
            if shape.is_empty() {
                return Err(SampleKvError::RankMismatch {
                    expected: 1,
                    actual: 0,
                });
            }
            match expected_len {
                None => expected_len = Some(shape[0]),
                Some(len) if len != shape[0] => {
                    return Err(SampleKvError::ShapeMismatch {
                        expected: vec![len],
                        actual: vec![shape[0]],
                        operation: format!("MemoryStore::new (key '{}')", key),
                    });
                }
                Some(_) => {}
            }
        }

        let fields = columns
            .iter()
            .map(|(key, array)| FieldSpec::new(key.clone(), array.dtype(), array.shape()[1..].to_vec()))
            .collect();
        let arrays = columns.into_iter().map(|(_, array)| array).collect();

        Ok(Self {
            fields,
            arrays,
            length: expected_len.unwrap_or(0),
            closed: AtomicBool::new(false),
        })
    }

    fn column(&self, key: &str) -> Result<&Array> {
        if self.is_closed() {
            return Err(SampleKvError::Closed);
        }
        self.fields
            .iter()
            .position(|f| f.key == key)
            .map(|i| &self.arrays[i])
            .ok_or_else(|| SampleKvError::unknown_key(key))
    }
}

impl SampleStore for MemoryStore {
    fn len(&self) -> usize {
        self.length
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn fetch(&self, key: &str, index: usize) -> Result<Array> {
        let column = self.column(key)?;
        check_index(index, self.length)?;
        column.select(index)
    }

    fn fetch_range(&self, key: &str, start: usize, end: usize) -> Result<Array> {
        let column = self.column(key)?;
        check_range(start, end, self.length)?;
        column.narrow(start, end)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("MemoryStore: closed ({} samples)", self.length);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl fmt::Display for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, "MemoryStore", "memory", self.length, &self.fields)
    }
}

#[cfg(test)]
#[path = "memory_store_test.rs"]
mod tests;
