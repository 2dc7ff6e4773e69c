//! # Array Operations (`ops`)
//!
//! Free functions over [`Array`](crate::Array) that build new arrays.
//!
//! - [`stack`]: join per-sample arrays along a new leading dimension.
//! - [`cast`]: convert an array to another [`DType`](crate::DType).

pub mod cast;
pub mod stack;

pub use cast::cast;
pub use stack::stack;
