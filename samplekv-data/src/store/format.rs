// samplekv-data/src/store/format.rs

//! On-disk layout of a SampleKV store file.
//!
//! ```text
//! +---------------------------+
//! | magic  b"SKV\0"  (4)      |
//! | version u32 LE   (4)      |
//! | header_len u64 LE (8)     |
//! +---------------------------+
//! | StoreHeader (bincode)     |  <- header_len bytes
//! +---------------------------+
//! | field 0: all samples      |  <- sample_count * sample_bytes, little-endian
//! | field 1: all samples      |
//! | ...                       |
//! +---------------------------+
//! ```
//!
//! Fields are stored one after another in header order, so the samples of a
//! field form one contiguous run and range reads need a single slice.

use bincode::Options;
use samplekv_core::{Result, SampleKvError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::traits::FieldSpec;

/// Magic bytes opening every store file.
pub const MAGIC: [u8; 4] = *b"SKV\0";

/// Current format version.
pub const VERSION: u32 = 1;

/// Size of the fixed preamble (magic, version, header length).
pub const PREAMBLE_LEN: usize = 16;

/// Decoded store header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreHeader {
    pub sample_count: u64,
    pub fields: Vec<FieldSpec>,
}

/// Data placement of one field inside the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldExtent {
    pub offset: usize,
    pub sample_bytes: usize,
}

fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

impl StoreHeader {
    pub fn new(sample_count: u64, fields: Vec<FieldSpec>) -> Self {
        Self {
            sample_count,
            fields,
        }
    }

    /// Encodes the preamble followed by the header.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let header = bincode_options()
            .serialize(self)
            .map_err(|e| SampleKvError::InvalidConfig(format!("cannot encode header: {}", e)))?;
        let mut out = Vec::with_capacity(PREAMBLE_LEN + header.len());
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(header.len() as u64).to_le_bytes());
        out.extend_from_slice(&header);
        Ok(out)
    }

    /// Decodes and validates the header of a complete store file image.
    ///
    /// Returns the header and the extent of every field, in header order.
    ///
    /// # Errors
    ///
    /// `SampleKvError::Corrupt` for a short file, bad magic, unsupported
    /// version, undecodable header, duplicate keys, or a file length that does
    /// not match the header.
    pub fn decode(path: &Path, bytes: &[u8]) -> Result<(Self, Vec<FieldExtent>)> {
        if bytes.len() < PREAMBLE_LEN {
            return Err(SampleKvError::corrupt(
                path,
                format!("file too short ({} bytes)", bytes.len()),
            ));
        }
        if bytes[0..4] != MAGIC {
            return Err(SampleKvError::corrupt(path, "bad magic bytes"));
        }
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != VERSION {
            return Err(SampleKvError::corrupt(
                path,
                format!("unsupported version {} (expected {})", version, VERSION),
            ));
        }
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&bytes[8..16]);
        let header_len = u64::from_le_bytes(len_bytes);
        let available = (bytes.len() - PREAMBLE_LEN) as u64;
        if header_len > available {
            return Err(SampleKvError::corrupt(
                path,
                format!("header length {} exceeds file size", header_len),
            ));
        }
        let header_end = PREAMBLE_LEN + header_len as usize;
        let header: StoreHeader = bincode_options()
            .with_limit(header_len)
            .deserialize(&bytes[PREAMBLE_LEN..header_end])
            .map_err(|e| SampleKvError::corrupt(path, format!("cannot decode header: {}", e)))?;

        let mut seen = HashSet::new();
        for field in &header.fields {
            if !seen.insert(field.key.as_str()) {
                return Err(SampleKvError::corrupt(
                    path,
                    format!("duplicate key '{}'", field.key),
                ));
            }
        }

        let extents = header
            .extents(header_end)
            .ok_or_else(|| SampleKvError::corrupt(path, "data size overflows"))?;
        let expected_len = match extents.last() {
            Some(last) => header
                .sample_count
                .checked_mul(last.sample_bytes as u64)
                .and_then(|n| n.checked_add(last.offset as u64)),
            None => Some(header_end as u64),
        }
        .ok_or_else(|| SampleKvError::corrupt(path, "data size overflows"))?;
        if expected_len != bytes.len() as u64 {
            return Err(SampleKvError::corrupt(
                path,
                format!(
                    "file is {} bytes but header describes {}",
                    bytes.len(),
                    expected_len
                ),
            ));
        }
        Ok((header, extents))
    }

    /// Lays out the fields after `data_start`, or `None` on overflow.
    pub fn extents(&self, data_start: usize) -> Option<Vec<FieldExtent>> {
        let count = usize::try_from(self.sample_count).ok()?;
        let mut offset = data_start;
        let mut extents = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let sample_bytes = field
                .shape
                .iter()
                .try_fold(field.dtype.size_of(), |acc, &d| acc.checked_mul(d))?;
            extents.push(FieldExtent {
                offset,
                sample_bytes,
            });
            offset = offset.checked_add(count.checked_mul(sample_bytes)?)?;
        }
        Some(extents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samplekv_core::DType;
    use std::path::PathBuf;

    fn header() -> StoreHeader {
        StoreHeader::new(
            3,
            vec![
                FieldSpec::new("X", DType::F32, vec![2]),
                FieldSpec::new("y", DType::U8, vec![]),
            ],
        )
    }

    fn image(header: &StoreHeader) -> Vec<u8> {
        let mut bytes = header.encode().unwrap();
        bytes.extend(std::iter::repeat(0u8).take(3 * 8 + 3));
        bytes
    }

    #[test]
    fn test_decode_valid_image() {
        let h = header();
        let bytes = image(&h);
        let (decoded, extents) = StoreHeader::decode(&PathBuf::from("t"), &bytes).unwrap();
        assert_eq!(decoded, h);
        assert_eq!(extents.len(), 2);
        assert_eq!(extents[0].sample_bytes, 8);
        assert_eq!(extents[1].offset, extents[0].offset + 24);
        assert_eq!(extents[1].sample_bytes, 1);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut bytes = image(&header());
        bytes[0] = b'X';
        let err = StoreHeader::decode(&PathBuf::from("t"), &bytes).unwrap_err();
        match err {
            SampleKvError::Corrupt { message, .. } => assert!(message.contains("magic")),
            other => panic!("Expected Corrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let mut bytes = image(&header());
        bytes[4..8].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            StoreHeader::decode(&PathBuf::from("t"), &bytes),
            Err(SampleKvError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        let mut bytes = image(&header());
        bytes.pop();
        assert!(matches!(
            StoreHeader::decode(&PathBuf::from("t"), &bytes),
            Err(SampleKvError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_short_file() {
        assert!(matches!(
            StoreHeader::decode(&PathBuf::from("t"), b"SKV"),
            Err(SampleKvError::Corrupt { .. })
        ));
    }
}
