use num_traits::{NumCast, ToPrimitive};
use std::fmt::Debug;
use std::sync::Arc;

use crate::array::ArrayData;
use crate::types::DType;

/// A Rust scalar type that can be stored in an [`Array`](crate::Array).
///
/// Each implementor maps to exactly one [`DType`] and knows how to move itself
/// in and out of [`ArrayData`] and the little-endian byte layout used on disk.
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {
    const DTYPE: DType;

    fn into_data(values: Vec<Self>) -> ArrayData;

    /// Borrows the typed slice if `data` holds this element type.
    fn view(data: &ArrayData) -> Option<&[Self]>;

    /// Decodes one element. `bytes.len()` must equal `Self::DTYPE.size_of()`.
    fn read_le(bytes: &[u8]) -> Self;

    fn write_le(self, out: &mut Vec<u8>);

    fn to_f64(self) -> f64;

    /// Converts from `f64`, or `None` when the value is not representable.
    fn from_f64(value: f64) -> Option<Self>;
}

macro_rules! impl_numeric_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            fn into_data(values: Vec<Self>) -> ArrayData {
                ArrayData::$variant(Arc::new(values))
            }

            fn view(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(bytes);
                <$t>::from_le_bytes(buf)
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn to_f64(self) -> f64 {
                ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
            }

            fn from_f64(value: f64) -> Option<Self> {
                <$t as NumCast>::from(value)
            }
        }
    };
}

impl_numeric_element!(f32, F32);
impl_numeric_element!(f64, F64);
impl_numeric_element!(i32, I32);
impl_numeric_element!(i64, I64);
impl_numeric_element!(u8, U8);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn into_data(values: Vec<Self>) -> ArrayData {
        ArrayData::Bool(Arc::new(values))
    }

    fn view(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Bool(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else {
            Some(value != 0.0)
        }
    }
}
