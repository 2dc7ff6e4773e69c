//! Read-only sample stores and the writer for the store file format.

pub mod format;
pub mod memory_store;
pub mod mmap_store;
pub mod traits;
pub mod writer;

pub use memory_store::MemoryStore;
pub use mmap_store::MmapStore;
pub use traits::{FieldSpec, Sample, SampleStore};
pub use writer::StoreWriter;

use samplekv_core::Result;
use std::path::Path;

/// Opens the store file at `path` read-only.
pub fn open(path: impl AsRef<Path>) -> Result<MmapStore> {
    MmapStore::open(path)
}
