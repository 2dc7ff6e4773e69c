// src/array.rs

use std::sync::Arc;

use crate::element::Element;
use crate::error::{Result, SampleKvError};
use crate::types::DType;

/// Runs `$body` with `$t` bound to the Rust element type of `$dtype`.
///
/// ```
/// use samplekv_core::{with_dtype, DType};
/// let size = with_dtype!(DType::I64, T => std::mem::size_of::<T>());
/// assert_eq!(size, 8);
/// ```
#[macro_export]
macro_rules! with_dtype {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::DType::F32 => {
                type $t = f32;
                $body
            }
            $crate::DType::F64 => {
                type $t = f64;
                $body
            }
            $crate::DType::I32 => {
                type $t = i32;
                $body
            }
            $crate::DType::I64 => {
                type $t = i64;
                $body
            }
            $crate::DType::U8 => {
                type $t = u8;
                $body
            }
            $crate::DType::Bool => {
                type $t = bool;
                $body
            }
        }
    };
}

/// Typed element buffer of an [`Array`].
///
/// Buffers sit behind `Arc` so cloning an array (e.g. handing the same sample
/// to several batches) does not copy element data.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    F32(Arc<Vec<f32>>),
    F64(Arc<Vec<f64>>),
    I32(Arc<Vec<i32>>),
    I64(Arc<Vec<i64>>),
    U8(Arc<Vec<u8>>),
    Bool(Arc<Vec<bool>>),
}

impl ArrayData {
    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::F32(_) => DType::F32,
            ArrayData::F64(_) => DType::F64,
            ArrayData::I32(_) => DType::I32,
            ArrayData::I64(_) => DType::I64,
            ArrayData::U8(_) => DType::U8,
            ArrayData::Bool(_) => DType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::F32(v) => v.len(),
            ArrayData::F64(v) => v.len(),
            ArrayData::I32(v) => v.len(),
            ArrayData::I64(v) => v.len(),
            ArrayData::U8(v) => v.len(),
            ArrayData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An immutable, contiguous, row-major N-dimensional array.
///
/// This is the unit the sample stores hand out: one field of one sample is an
/// `Array` of the field's shape, and a batch field is an `Array` with an extra
/// leading dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: ArrayData,
    shape: Vec<usize>,
}

impl Array {
    /// Creates an array from flattened row-major values.
    ///
    /// # Errors
    /// Returns `SampleKvError::ArrayCreationError` if `values.len()` does not
    /// match the number of elements described by `shape`.
    pub fn new<T: Element>(values: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if values.len() != numel {
            return Err(SampleKvError::ArrayCreationError {
                data_len: values.len(),
                shape,
            });
        }
        Ok(Self {
            data: T::into_data(values),
            shape,
        })
    }

    /// Creates a rank-0 array holding a single value.
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            data: T::into_data(vec![value]),
            shape: Vec::new(),
        }
    }

    pub(crate) fn from_data(data: ArrayData, shape: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Self { data, shape }
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Size of the element data in bytes.
    pub fn nbytes(&self) -> usize {
        self.numel() * self.dtype().size_of()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Borrows the elements as a typed slice.
    ///
    /// # Errors
    /// Returns `SampleKvError::DTypeMismatch` if `T` is not the array's dtype.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::view(&self.data).ok_or_else(|| SampleKvError::DTypeMismatch {
            expected: T::DTYPE,
            actual: self.dtype(),
            operation: "as_slice".to_string(),
        })
    }

    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        Ok(self.as_slice::<T>()?.to_vec())
    }

    /// All elements converted to `f64` (booleans become 0.0 / 1.0).
    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_dtype!(self.dtype(), T => {
            T::view(&self.data)
                .map(|values| values.iter().map(|v| v.to_f64()).collect())
                .unwrap_or_default()
        })
    }

    /// Number of elements in one entry along the leading axis.
    fn row_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Selects entry `index` along the leading axis, dropping that axis.
    ///
    /// # Errors
    /// `RankMismatch` for rank-0 arrays, `OutOfRange` if `index` is past the
    /// leading dimension.
    pub fn select(&self, index: usize) -> Result<Array> {
        let mut out = self.narrow(index, index + 1)?;
        out.shape.remove(0);
        Ok(out)
    }

    /// Keeps entries `[start, end)` along the leading axis.
    pub fn narrow(&self, start: usize, end: usize) -> Result<Array> {
        if self.shape.is_empty() {
            return Err(SampleKvError::RankMismatch {
                expected: 1,
                actual: 0,
            });
        }
        let len = self.shape[0];
        if start > end {
            return Err(SampleKvError::OutOfRange { index: start, len });
        }
        if end > len {
            return Err(SampleKvError::OutOfRange {
                index: end - 1,
                len,
            });
        }
        let row = self.row_len();
        let mut shape = self.shape.clone();
        shape[0] = end - start;
        let data = with_dtype!(self.dtype(), T => {
            let values = self.as_slice::<T>()?;
            T::into_data(values[start * row..end * row].to_vec())
        });
        Ok(Array::from_data(data, shape))
    }

    /// Decodes little-endian element bytes into an array of `shape`.
    ///
    /// # Errors
    /// `ArrayCreationError` if the byte count does not match `shape` and `dtype`.
    pub fn from_le_bytes(dtype: DType, shape: Vec<usize>, bytes: &[u8]) -> Result<Array> {
        let numel: usize = shape.iter().product();
        let width = dtype.size_of();
        if bytes.len() != numel * width {
            return Err(SampleKvError::ArrayCreationError {
                data_len: bytes.len() / width,
                shape,
            });
        }
        let data = with_dtype!(dtype, T => {
            T::into_data(bytes.chunks_exact(width).map(T::read_le).collect())
        });
        Ok(Array::from_data(data, shape))
    }

    /// Appends the little-endian element bytes to `out`.
    pub fn write_le_bytes(&self, out: &mut Vec<u8>) {
        out.reserve(self.nbytes());
        with_dtype!(self.dtype(), T => {
            if let Some(values) = T::view(&self.data) {
                for v in values {
                    v.write_le(out);
                }
            }
        })
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.nbytes());
        self.write_le_bytes(&mut out);
        out
    }
}

#[cfg(test)]
#[path = "array_test.rs"]
mod tests;
