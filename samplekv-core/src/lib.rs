//! Core building blocks shared by the SampleKV crates: typed N-dimensional
//! arrays, their element types, and the common error type.

pub mod array;
pub mod element;
pub mod error;
pub mod ops;
pub mod types;

// Re-export the main types so they are reachable as `samplekv_core::Array`, etc.
pub use array::{Array, ArrayData};
pub use element::Element;
pub use error::{Result, SampleKvError};
pub use types::DType;
