use crate::array::Array;
use crate::element::Element;
use crate::error::{Result, SampleKvError};
use crate::types::DType;
use crate::with_dtype;
use log::trace;

/// Converts an array to `new_dtype`, returning a new array with the same shape.
///
/// Values pass through `f64`. Casting to the array's own dtype is a cheap
/// clone sharing the buffer.
///
/// # Errors
/// `InvalidCast` if a value cannot be represented in the target type
/// (NaN to an integer, 300.0 to `u8`, ...).
pub fn cast(array: &Array, new_dtype: DType) -> Result<Array> {
    let from = array.dtype();
    if from == new_dtype {
        return Ok(array.clone());
    }
    trace!("cast: {} -> {} ({} elements)", from, new_dtype, array.numel());
    let source = array.to_f64_vec();
    with_dtype!(new_dtype, T => {
        let mut values: Vec<T> = Vec::with_capacity(source.len());
        for value in source {
            let converted = T::from_f64(value).ok_or(SampleKvError::InvalidCast {
                value,
                from,
                to: new_dtype,
            })?;
            values.push(converted);
        }
        Array::new(values, array.shape().to_vec())
    })
}
