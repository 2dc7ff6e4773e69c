use crate::types::DType;
use std::path::PathBuf;
use thiserror::Error;

/// Error type shared by every SampleKV crate.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum SampleKvError {
    #[error("Store is closed")]
    Closed,

    #[error("Index out of range: index {index} for a store of {len} samples")]
    OutOfRange { index: usize, len: usize },

    #[error("Unknown key '{key}'")]
    UnknownKey { key: String },

    /// Control signal, not a failure: a non-endless iterator finished its epoch.
    #[error("Iteration stopped: the epoch is exhausted")]
    StopIteration,

    #[error("Store not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("Corrupt store at {path:?}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("I/O error at {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("DType mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    DTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Rank mismatch: expected at least {expected}, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    #[error("Array creation error: data length {data_len} does not match shape {shape:?}")]
    ArrayCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Cannot stack an empty list of arrays")]
    EmptyArrayList,

    #[error("Cannot cast value {value} from {from:?} to {to:?}")]
    InvalidCast { value: f64, from: DType, to: DType },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SampleKvError>;

impl SampleKvError {
    /// True for the end-of-epoch control signal.
    pub fn is_stop_iteration(&self) -> bool {
        matches!(self, SampleKvError::StopIteration)
    }

    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }
}
