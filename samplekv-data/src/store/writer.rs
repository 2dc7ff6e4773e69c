// samplekv-data/src/store/writer.rs

use log::info;
use samplekv_core::{Array, Result, SampleKvError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::format::StoreHeader;
use super::traits::{FieldSpec, Sample};

/// Accumulates samples in memory and writes them as one store file.
///
/// Samples are validated against the declared fields as they are added, so
/// `finish` only fails on I/O.
#[derive(Debug)]
pub struct StoreWriter {
    fields: Vec<FieldSpec>,
    columns: Vec<Vec<u8>>,
    sample_count: usize,
}

impl StoreWriter {
    /// Creates a writer for the given fields.
    ///
    /// # Errors
    ///
    /// Returns `SampleKvError::InvalidConfig` if `fields` is empty or a key
    /// appears twice.
    pub fn new(mut fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            return Err(SampleKvError::InvalidConfig(
                "a store needs at least one field".to_string(),
            ));
        }
        fields.sort_by(|a, b| a.key.cmp(&b.key));
        if let Some(pair) = fields.windows(2).find(|w| w[0].key == w[1].key) {
            return Err(SampleKvError::InvalidConfig(format!(
                "duplicate key '{}'",
                pair[0].key
            )));
        }
        let columns = vec![Vec::new(); fields.len()];
        Ok(Self {
            fields,
            columns,
            sample_count: 0,
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Appends one sample. Every declared field must be present with its
    /// declared dtype and shape, and no other key may appear.
    pub fn put_sample(&mut self, sample: &Sample) -> Result<()> {
        if let Some(extra) = sample
            .keys()
            .find(|k| !self.fields.iter().any(|f| &f.key == *k))
        {
            return Err(SampleKvError::unknown_key(extra.clone()));
        }
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let array = sample
                .get(&field.key)
                .ok_or_else(|| SampleKvError::unknown_key(field.key.clone()))?;
            check_field(field, array, &field.shape, "StoreWriter::put_sample")?;
            values.push(array);
        }
        for (column, array) in self.columns.iter_mut().zip(values) {
            array.write_le_bytes(column);
        }
        self.sample_count += 1;
        Ok(())
    }

    /// Appends a block of samples given as one array per key, each with the
    /// sample count as its leading dimension.
    pub fn put_batch<K: AsRef<str>>(&mut self, batch: &[(K, Array)]) -> Result<()> {
        if batch.len() != self.fields.len() {
            return Err(SampleKvError::InvalidConfig(format!(
                "expected {} fields, got {}",
                self.fields.len(),
                batch.len()
            )));
        }
        let count = batch
            .first()
            .and_then(|(_, a)| a.shape().first().copied())
            .unwrap_or(0);
        let mut ordered: Vec<Option<&Array>> = vec![None; self.fields.len()];
        for (key, array) in batch {
            let key = key.as_ref();
            let slot = self
                .fields
                .iter()
                .position(|f| f.key == key)
                .ok_or_else(|| SampleKvError::unknown_key(key))?;
            if ordered[slot].is_some() {
                return Err(SampleKvError::InvalidConfig(format!(
                    "duplicate key '{}'",
                    key
                )));
            }
            check_field(
                &self.fields[slot],
                array,
                &self.fields[slot].batch_shape(count),
                "StoreWriter::put_batch",
            )?;
            ordered[slot] = Some(array);
        }
        for (column, array) in self.columns.iter_mut().zip(ordered.into_iter().flatten()) {
            array.write_le_bytes(column);
        }
        self.sample_count += count;
        Ok(())
    }

    /// Writes the store file to `path`, replacing any existing file.
    pub fn finish(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let header = StoreHeader::new(self.sample_count as u64, self.fields);
        let preamble = header.encode()?;

        let file = File::create(path).map_err(|e| SampleKvError::io(path, e))?;
        let mut out = BufWriter::new(file);
        out.write_all(&preamble)
            .map_err(|e| SampleKvError::io(path, e))?;
        for column in &self.columns {
            out.write_all(column).map_err(|e| SampleKvError::io(path, e))?;
        }
        out.flush().map_err(|e| SampleKvError::io(path, e))?;

        info!(
            "StoreWriter: wrote {} samples ({} fields) to {:?}",
            self.sample_count,
            header.fields.len(),
            path
        );
        Ok(())
    }
}

fn check_field(field: &FieldSpec, array: &Array, shape: &[usize], operation: &str) -> Result<()> {
    if array.dtype() != field.dtype {
        return Err(SampleKvError::DTypeMismatch {
            expected: field.dtype,
            actual: array.dtype(),
            operation: format!("{} (key '{}')", operation, field.key),
        });
    }
    if array.shape() != shape {
        return Err(SampleKvError::ShapeMismatch {
            expected: shape.to_vec(),
            actual: array.shape().to_vec(),
            operation: format!("{} (key '{}')", operation, field.key),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use samplekv_core::DType;

    fn writer() -> StoreWriter {
        StoreWriter::new(vec![
            FieldSpec::new("y", DType::I64, vec![]),
            FieldSpec::new("X", DType::F32, vec![2]),
        ])
        .unwrap()
    }

    #[test]
    fn test_fields_are_sorted() {
        let w = writer();
        let keys: Vec<&str> = w.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["X", "y"]);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = StoreWriter::new(vec![
            FieldSpec::new("a", DType::U8, vec![]),
            FieldSpec::new("a", DType::U8, vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, SampleKvError::InvalidConfig(_)));
    }

    #[test]
    fn test_put_sample_validates_before_appending() {
        let mut w = writer();
        let mut sample = Sample::new();
        sample.insert("X".to_string(), Array::new(vec![1.0f32, 2.0], vec![2]).unwrap());
        sample.insert("y".to_string(), Array::scalar(1.0f64));
        let err = w.put_sample(&sample).unwrap_err();
        assert!(matches!(err, SampleKvError::DTypeMismatch { .. }));
        assert_eq!(w.sample_count(), 0);
        assert!(w.columns.iter().all(|c| c.is_empty()));

        sample.insert("y".to_string(), Array::scalar(1i64));
        w.put_sample(&sample).unwrap();
        assert_eq!(w.sample_count(), 1);
        assert_eq!(w.columns[0].len(), 8);
        assert_eq!(w.columns[1].len(), 8);
    }

    #[test]
    fn test_put_sample_rejects_missing_and_extra_keys() {
        let mut w = writer();
        let mut sample = Sample::new();
        sample.insert("X".to_string(), Array::new(vec![1.0f32, 2.0], vec![2]).unwrap());
        assert_eq!(
            w.put_sample(&sample).unwrap_err(),
            SampleKvError::unknown_key("y")
        );
        sample.insert("y".to_string(), Array::scalar(1i64));
        sample.insert("z".to_string(), Array::scalar(1i64));
        assert_eq!(
            w.put_sample(&sample).unwrap_err(),
            SampleKvError::unknown_key("z")
        );
    }

    #[test]
    fn test_put_batch_checks_leading_dimension() {
        let mut w = writer();
        let x = Array::new(vec![0.0f32; 6], vec![3, 2]).unwrap();
        let y = Array::new(vec![0i64; 2], vec![2]).unwrap();
        let err = w.put_batch(&[("X", x.clone()), ("y", y)]).unwrap_err();
        assert!(matches!(err, SampleKvError::ShapeMismatch { .. }));

        let y = Array::new(vec![0i64, 1, 2], vec![3]).unwrap();
        w.put_batch(&[("y", y), ("X", x)]).unwrap();
        assert_eq!(w.sample_count(), 3);
    }
}
