// samplekv-data/src/store/traits.rs

use samplekv_core::ops::stack;
use samplekv_core::{Array, DType, Result, SampleKvError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Debug;

/// All fields of one sample, keyed by field name.
pub type Sample = BTreeMap<String, Array>;

/// Describes one stored field: its element type and per-sample shape.
///
/// Every sample of a field has exactly this dtype and shape, which is what
/// lets batches be stacked without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub dtype: DType,
    pub shape: Vec<usize>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, dtype: DType, shape: Vec<usize>) -> Self {
        Self {
            key: key.into(),
            dtype,
            shape,
        }
    }

    /// Number of elements in one sample of this field.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Size of one sample of this field in bytes.
    pub fn sample_bytes(&self) -> usize {
        self.numel() * self.dtype.size_of()
    }

    /// Shape of `count` samples stacked along a new leading dimension.
    pub fn batch_shape(&self, count: usize) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.shape.len() + 1);
        shape.push(count);
        shape.extend_from_slice(&self.shape);
        shape
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{:?}", self.key, self.dtype, self.shape)
    }
}

/// A read-only, randomly addressable collection of samples.
///
/// The sample count and the set of fields are fixed for the lifetime of the
/// store. Reads take `&self` and must be safe to issue from several threads at
/// once; `close` is the only state change and makes every later read fail with
/// `SampleKvError::Closed`.
pub trait SampleStore: Debug + Send + Sync {
    /// Returns the total number of samples.
    fn len(&self) -> usize;

    /// Checks if the store holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field descriptions, sorted by key.
    fn fields(&self) -> &[FieldSpec];

    /// Stored keys, sorted.
    fn keys(&self) -> Vec<String> {
        self.fields().iter().map(|f| f.key.clone()).collect()
    }

    fn field_spec(&self, key: &str) -> Option<&FieldSpec> {
        self.fields().iter().find(|f| f.key == key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.field_spec(key).is_some()
    }

    /// Reads field `key` of sample `index`.
    ///
    /// The returned array has the field's per-sample shape.
    ///
    /// # Errors
    ///
    /// `Closed` after [`close`](SampleStore::close), `UnknownKey` if the key is
    /// not stored, `OutOfRange` if `index >= len()`.
    fn fetch(&self, key: &str, index: usize) -> Result<Array>;

    /// Reads field `key` of samples `[start, end)`, stacked along a new
    /// leading dimension.
    ///
    /// The default stacks individual [`fetch`](SampleStore::fetch) calls;
    /// stores with a contiguous layout override it with a single read.
    fn fetch_range(&self, key: &str, start: usize, end: usize) -> Result<Array> {
        if self.is_closed() {
            return Err(SampleKvError::Closed);
        }
        let spec = self
            .field_spec(key)
            .ok_or_else(|| SampleKvError::unknown_key(key))?;
        check_range(start, end, self.len())?;
        if start == end {
            return Array::from_le_bytes(spec.dtype, spec.batch_shape(0), &[]);
        }
        let items = (start..end)
            .map(|index| self.fetch(key, index))
            .collect::<Result<Vec<_>>>()?;
        stack(&items)
    }

    /// Reads every field of sample `index`.
    fn fetch_sample(&self, index: usize) -> Result<Sample> {
        self.fields()
            .iter()
            .map(|f| Ok((f.key.clone(), self.fetch(&f.key, index)?)))
            .collect()
    }

    /// Closes the store. Idempotent.
    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// Validates a single sample index against the store length.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(SampleKvError::OutOfRange { index, len });
    }
    Ok(())
}

/// Validates a half-open sample range against the store length.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if start > end {
        return Err(SampleKvError::OutOfRange { index: start, len });
    }
    if end > len {
        return Err(SampleKvError::OutOfRange {
            index: end - 1,
            len,
        });
    }
    Ok(())
}

/// Shared `Display` body: `Name(location, N samples) [key: dtype[shape], ...]`.
pub(crate) fn describe(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    location: &str,
    len: usize,
    fields: &[FieldSpec],
) -> fmt::Result {
    write!(f, "{}({}, {} samples) [", name, location, len)?;
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", field)?;
    }
    f.write_str("]")
}
