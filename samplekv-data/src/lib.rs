//! Batch iteration over read-only sample stores.
//!
//! A [`SampleStore`] holds `N` samples, each a set of named, fixed-shape
//! arrays. The iterators in [`iterators`] turn a store into a stream of
//! [`Batch`]es:
//!
//! ```no_run
//! use std::sync::Arc;
//! use samplekv_data::{store, BatchSource, IteratorConfig};
//!
//! # fn main() -> samplekv_data::Result<()> {
//! let store = Arc::new(store::open("train.skv")?);
//! let mut batches = IteratorConfig::new(["X", "y"])
//!     .with_batch_size(64)
//!     .with_shuffle(true)
//!     .with_seed(7)
//!     .build(store)?;
//! let batch = batches.next_batch()?;
//! println!("{} samples, last of epoch: {}", batch.len(), batch.end_of_dataset());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod collate;
pub mod config;
pub mod cursor;
pub mod iterators;
pub mod samplers;
pub mod store;

pub use batch::Batch;
pub use config::{IteratorConfig, IteratorMode};
pub use cursor::Cursor;
pub use iterators::{
    BatchIterator, BatchSource, MapBatches, SequentialBatchIterator, SharedMapBatches,
    SimpleBatchIterator, StochasticBatchIterator, ThreadSafeIterator,
};
pub use samplers::{EpochOrder, RandomSource, UniformSampler};
pub use store::{FieldSpec, MemoryStore, MmapStore, Sample, SampleStore, StoreWriter};

// Re-export the shared core types so users need a single dependency.
pub use samplekv_core::{Array, DType, Result, SampleKvError};
