// samplekv-data/src/store/mmap_store_test.rs

use super::*;
use crate::store::writer::StoreWriter;
use samplekv_core::DType;
use std::io::Write;
use tempfile::TempDir;

fn write_store(dir: &TempDir, n: usize) -> PathBuf {
    let mut writer = StoreWriter::new(vec![
        FieldSpec::new("X", DType::F32, vec![2]),
        FieldSpec::new("y", DType::I64, vec![]),
    ])
    .unwrap();
    let x: Vec<f32> = (0..n).flat_map(|i| [i as f32, i as f32 + 0.5]).collect();
    let y: Vec<i64> = (0..n as i64).collect();
    writer
        .put_batch(&[
            ("X", Array::new(x, vec![n, 2]).unwrap()),
            ("y", Array::new(y, vec![n]).unwrap()),
        ])
        .unwrap();
    let path = dir.path().join("samples.skv");
    writer.finish(&path).unwrap();
    path
}

#[test]
fn test_open_reads_header() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, 5);
    let store = MmapStore::open(&path).unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(store.keys(), vec!["X".to_string(), "y".to_string()]);
    assert_eq!(store.field_spec("X").unwrap().shape, vec![2]);
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_fetch_single_sample() {
    let dir = TempDir::new().unwrap();
    let store = MmapStore::open(write_store(&dir, 5)).unwrap();
    let x = store.fetch("X", 3).unwrap();
    assert_eq!(x.shape(), &[2]);
    assert_eq!(x.as_slice::<f32>().unwrap(), &[3.0, 3.5]);
    let y = store.fetch("y", 4).unwrap();
    assert_eq!(y.rank(), 0);
    assert_eq!(y.as_slice::<i64>().unwrap(), &[4]);
}

#[test]
fn test_fetch_errors() {
    let dir = TempDir::new().unwrap();
    let store = MmapStore::open(write_store(&dir, 5)).unwrap();
    assert_eq!(
        store.fetch("X", 5).unwrap_err(),
        SampleKvError::OutOfRange { index: 5, len: 5 }
    );
    assert_eq!(
        store.fetch("label", 0).unwrap_err(),
        SampleKvError::unknown_key("label")
    );
}

#[test]
fn test_range_read_matches_stacked_single_reads() {
    let dir = TempDir::new().unwrap();
    let store = MmapStore::open(write_store(&dir, 8)).unwrap();
    for key in ["X", "y"] {
        let contiguous = store.fetch_range(key, 2, 7).unwrap();
        let items: Vec<Array> = (2..7).map(|i| store.fetch(key, i).unwrap()).collect();
        let stacked = samplekv_core::ops::stack(&items).unwrap();
        assert_eq!(contiguous, stacked);
    }
    let empty = store.fetch_range("X", 3, 3).unwrap();
    assert_eq!(empty.shape(), &[0, 2]);
}

#[test]
fn test_fetch_after_close_fails() {
    let dir = TempDir::new().unwrap();
    let store = MmapStore::open(write_store(&dir, 3)).unwrap();
    store.close();
    store.close();
    assert!(store.is_closed());
    assert_eq!(store.fetch("X", 0).unwrap_err(), SampleKvError::Closed);
    assert_eq!(store.fetch("nope", 0).unwrap_err(), SampleKvError::Closed);
    assert_eq!(
        store.fetch_range("y", 0, 2).unwrap_err(),
        SampleKvError::Closed
    );
    assert_eq!(store.len(), 3);
}

#[test]
fn test_open_missing_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.skv");
    assert_eq!(
        MmapStore::open(&path).unwrap_err(),
        SampleKvError::NotFound { path }
    );
}

#[test]
fn test_open_directory_is_corrupt() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        MmapStore::open(dir.path()),
        Err(SampleKvError::Corrupt { .. })
    ));
}

#[test]
fn test_open_garbage_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.skv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"definitely not a sample store file").unwrap();
    drop(file);
    assert!(matches!(
        MmapStore::open(&path),
        Err(SampleKvError::Corrupt { .. })
    ));
}

#[test]
fn test_open_truncated_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, 4);
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
    match MmapStore::open(&path).unwrap_err() {
        SampleKvError::Corrupt { message, .. } => assert!(message.contains("header describes")),
        other => panic!("Expected Corrupt, got {:?}", other),
    }
}

#[test]
fn test_open_shorter_than_preamble_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.skv");
    std::fs::write(&path, b"SKV\0\x01\0\0\0").unwrap();
    match MmapStore::open(&path).unwrap_err() {
        SampleKvError::Corrupt { message, .. } => assert!(message.contains("too short")),
        other => panic!("Expected Corrupt, got {:?}", other),
    }
}

#[test]
fn test_display() {
    let dir = TempDir::new().unwrap();
    let path = write_store(&dir, 2);
    let store = MmapStore::open(&path).unwrap();
    let text = store.to_string();
    assert!(text.starts_with("MmapStore("));
    assert!(text.ends_with("2 samples) [X: f32[2], y: i64[]]"));
}
