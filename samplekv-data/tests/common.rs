use samplekv_data::{Array, DType, FieldSpec, MemoryStore, StoreWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

static LOGGER_INIT: Once = Once::new();

// Installs env_logger once per test binary; RUST_LOG controls the output.
#[allow(dead_code)]
pub fn setup_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

// Sample i has X = [i, i + 0.5] (f32) and y = i (i64), so a batch's contents
// can be checked against its indices.
#[allow(dead_code)]
pub fn memory_store(n: usize) -> Arc<MemoryStore> {
    let (x, y) = columns(n);
    Arc::new(MemoryStore::new(vec![("X", x), ("y", y)]).expect("Test store creation failed"))
}

// Same contents as `memory_store`, written to `dir/name`.
#[allow(dead_code)]
pub fn file_store(dir: &Path, name: &str, n: usize) -> PathBuf {
    let mut writer = StoreWriter::new(vec![
        FieldSpec::new("X", DType::F32, vec![2]),
        FieldSpec::new("y", DType::I64, vec![]),
    ])
    .expect("Test writer creation failed");
    let (x, y) = columns(n);
    writer
        .put_batch(&[("X", x), ("y", y)])
        .expect("Test samples rejected");
    let path = dir.join(name);
    writer.finish(&path).expect("Test store write failed");
    path
}

fn columns(n: usize) -> (Array, Array) {
    let x: Vec<f32> = (0..n).flat_map(|i| [i as f32, i as f32 + 0.5]).collect();
    let y: Vec<i64> = (0..n as i64).collect();
    (
        Array::new(x, vec![n, 2]).expect("X creation failed"),
        Array::new(y, vec![n]).expect("y creation failed"),
    )
}

// Checks that every field of `batch` holds the samples named by its indices.
#[allow(dead_code)]
pub fn assert_batch_matches_indices(batch: &samplekv_data::Batch) {
    let expected_y: Vec<i64> = batch.indices().iter().map(|&i| i as i64).collect();
    assert_eq!(
        batch.field("y").unwrap().as_slice::<i64>().unwrap(),
        expected_y.as_slice()
    );
    if let Some(x) = batch.get("X") {
        let expected_x: Vec<f32> = batch
            .indices()
            .iter()
            .flat_map(|&i| [i as f32, i as f32 + 0.5])
            .collect();
        assert_eq!(x.shape(), &[batch.len(), 2]);
        assert_eq!(x.as_slice::<f32>().unwrap(), expected_x.as_slice());
    }
}
