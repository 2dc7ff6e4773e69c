use crate::array::Array;
use crate::error::{Result, SampleKvError};
use crate::with_dtype;

/// Stacks arrays of identical dtype and shape along a new leading dimension.
///
/// `n` arrays of shape `[d0, d1, ...]` produce one array of shape
/// `[n, d0, d1, ...]`, entries in input order.
///
/// # Errors
/// - `EmptyArrayList` if `arrays` is empty.
/// - `DTypeMismatch` / `ShapeMismatch` if any array differs from the first.
pub fn stack(arrays: &[Array]) -> Result<Array> {
    let first = arrays.first().ok_or(SampleKvError::EmptyArrayList)?;
    let dtype = first.dtype();
    let item_shape = first.shape().to_vec();

    for array in arrays.iter().skip(1) {
        if array.dtype() != dtype {
            return Err(SampleKvError::DTypeMismatch {
                expected: dtype,
                actual: array.dtype(),
                operation: "stack".to_string(),
            });
        }
        if array.shape() != item_shape.as_slice() {
            return Err(SampleKvError::ShapeMismatch {
                expected: item_shape,
                actual: array.shape().to_vec(),
                operation: "stack".to_string(),
            });
        }
    }

    let mut out_shape = Vec::with_capacity(item_shape.len() + 1);
    out_shape.push(arrays.len());
    out_shape.extend_from_slice(&item_shape);

    let numel = first.numel() * arrays.len();
    with_dtype!(dtype, T => {
        let mut values: Vec<T> = Vec::with_capacity(numel);
        for array in arrays {
            values.extend_from_slice(array.as_slice::<T>()?);
        }
        Array::new(values, out_shape)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DType;

    #[test]
    fn test_stack_vectors() {
        let a = Array::new(vec![1.0f32, 2.0], vec![2]).unwrap();
        let b = Array::new(vec![3.0f32, 4.0], vec![2]).unwrap();
        let c = Array::new(vec![5.0f32, 6.0], vec![2]).unwrap();
        let s = stack(&[a, b, c]).unwrap();
        assert_eq!(s.shape(), &[3, 2]);
        assert_eq!(s.as_slice::<f32>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_stack_scalars() {
        let labels: Vec<Array> = [3i64, 1, 4].iter().map(|&v| Array::scalar(v)).collect();
        let s = stack(&labels).unwrap();
        assert_eq!(s.shape(), &[3]);
        assert_eq!(s.dtype(), DType::I64);
        assert_eq!(s.as_slice::<i64>().unwrap(), &[3, 1, 4]);
    }

    #[test]
    fn test_stack_single() {
        let a = Array::new(vec![1u8, 2, 3, 4], vec![2, 2]).unwrap();
        let s = stack(std::slice::from_ref(&a)).unwrap();
        assert_eq!(s.shape(), &[1, 2, 2]);
    }

    #[test]
    fn test_stack_empty() {
        assert_eq!(stack(&[]).unwrap_err(), SampleKvError::EmptyArrayList);
    }

    #[test]
    fn test_stack_shape_mismatch() {
        let a = Array::new(vec![1.0f32, 2.0], vec![2]).unwrap();
        let b = Array::new(vec![1.0f32, 2.0, 3.0], vec![3]).unwrap();
        match stack(&[a, b]).unwrap_err() {
            SampleKvError::ShapeMismatch { expected, actual, .. } => {
                assert_eq!(expected, vec![2]);
                assert_eq!(actual, vec![3]);
            }
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_stack_dtype_mismatch() {
        let a = Array::new(vec![1.0f32], vec![1]).unwrap();
        let b = Array::new(vec![1.0f64], vec![1]).unwrap();
        assert!(matches!(
            stack(&[a, b]).unwrap_err(),
            SampleKvError::DTypeMismatch { .. }
        ));
    }
}
