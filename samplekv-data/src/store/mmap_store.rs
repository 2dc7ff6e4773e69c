// samplekv-data/src/store/mmap_store.rs

use log::{debug, info};
use memmap2::Mmap;
use parking_lot::RwLock;
use samplekv_core::{Array, Result, SampleKvError};
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::format::{FieldExtent, StoreHeader, PREAMBLE_LEN};
use super::traits::{check_index, check_range, describe, FieldSpec, SampleStore};

/// A read-only store backed by a memory-mapped store file.
///
/// The header is decoded once at open time; reads slice the mapping directly.
/// Because each field is stored as one contiguous run, `fetch_range` costs a
/// single copy per key.
#[derive(Debug)]
pub struct MmapStore {
    path: PathBuf,
    fields: Vec<FieldSpec>,
    extents: Vec<FieldExtent>,
    length: usize,
    map: RwLock<Option<Mmap>>,
}

impl MmapStore {
    /// Opens the store file at `path`.
    ///
    /// # Errors
    ///
    /// * `SampleKvError::NotFound` if nothing exists at `path`.
    /// * `SampleKvError::Corrupt` if the path is a directory or the file is not
    ///   a valid store.
    /// * `SampleKvError::Io` for any other I/O failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SampleKvError::NotFound { path: path.clone() },
            _ => SampleKvError::io(&path, e),
        })?;
        if metadata.is_dir() {
            return Err(SampleKvError::corrupt(&path, "path is a directory"));
        }
        if metadata.len() < PREAMBLE_LEN as u64 {
            return Err(SampleKvError::corrupt(
                &path,
                format!("file too short ({} bytes)", metadata.len()),
            ));
        }

        let file = File::open(&path).map_err(|e| SampleKvError::io(&path, e))?;
        // SAFETY: The file is opened read-only and store files are never
        // modified after the writer finishes them.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| SampleKvError::io(&path, e))?;

        let (header, extents) = StoreHeader::decode(&path, &mmap)?;
        let length = usize::try_from(header.sample_count)
            .map_err(|_| SampleKvError::corrupt(&path, "sample count does not fit in memory"))?;

        info!(
            "MmapStore: opened {:?} ({} samples, {} fields, {} bytes)",
            path,
            length,
            header.fields.len(),
            mmap.len()
        );
        for field in &header.fields {
            debug!("MmapStore: field {}", field);
        }

        Ok(Self {
            path,
            fields: header.fields,
            extents,
            length,
            map: RwLock::new(Some(mmap)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, key: &str) -> Result<(&FieldSpec, FieldExtent)> {
        self.fields
            .iter()
            .position(|f| f.key == key)
            .map(|i| (&self.fields[i], self.extents[i]))
            .ok_or_else(|| SampleKvError::unknown_key(key))
    }

    /// Decodes samples `[start, end)` of `key` with the given result shape.
    fn read(
        &self,
        key: &str,
        start: usize,
        end: usize,
        shape: impl FnOnce(&FieldSpec) -> Vec<usize>,
    ) -> Result<Array> {
        let guard = self.map.read();
        let map = guard.as_ref().ok_or(SampleKvError::Closed)?;
        let (spec, extent) = self.lookup(key)?;
        let from = extent.offset + start * extent.sample_bytes;
        let to = extent.offset + end * extent.sample_bytes;
        Array::from_le_bytes(spec.dtype, shape(spec), &map[from..to])
    }
}

impl SampleStore for MmapStore {
    fn len(&self) -> usize {
        self.length
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn fetch(&self, key: &str, index: usize) -> Result<Array> {
        if self.is_closed() {
            return Err(SampleKvError::Closed);
        }
        self.lookup(key)?;
        check_index(index, self.length)?;
        self.read(key, index, index + 1, |spec| spec.shape.clone())
    }

    fn fetch_range(&self, key: &str, start: usize, end: usize) -> Result<Array> {
        if self.is_closed() {
            return Err(SampleKvError::Closed);
        }
        self.lookup(key)?;
        check_range(start, end, self.length)?;
        self.read(key, start, end, |spec| spec.batch_shape(end - start))
    }

    fn close(&self) {
        if self.map.write().take().is_some() {
            info!("MmapStore: closed {:?}", self.path);
        }
    }

    fn is_closed(&self) -> bool {
        self.map.read().is_none()
    }
}

impl fmt::Display for MmapStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            "MmapStore",
            &self.path.display().to_string(),
            self.length,
            &self.fields,
        )
    }
}

#[cfg(test)]
#[path = "mmap_store_test.rs"]
mod tests;
