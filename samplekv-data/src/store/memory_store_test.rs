// samplekv-data/src/store/memory_store_test.rs

use super::*;
use samplekv_core::DType;

fn create_test_array(data: Vec<f32>, shape: &[usize]) -> Array {
    Array::new(data, shape.to_vec()).unwrap()
}

fn xy_store() -> MemoryStore {
    let x = create_test_array(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]);
    let y = Array::new(vec![10i64, 20, 30], vec![3]).unwrap();
    MemoryStore::new(vec![("y", y), ("X", x)]).unwrap()
}

#[test]
fn test_memory_store_new_empty() {
    let store = MemoryStore::new(Vec::<(String, Array)>::new()).unwrap();
    assert_eq!(store.len(), 0);
    assert!(store.is_empty());
    assert!(store.keys().is_empty());
}

#[test]
fn test_memory_store_fields_are_sorted() {
    let store = xy_store();
    assert_eq!(store.len(), 3);
    assert_eq!(store.keys(), vec!["X".to_string(), "y".to_string()]);
    let x = store.field_spec("X").unwrap();
    assert_eq!(x.dtype, DType::F32);
    assert_eq!(x.shape, vec![2]);
    let y = store.field_spec("y").unwrap();
    assert_eq!(y.dtype, DType::I64);
    assert!(y.shape.is_empty());
}

#[test]
fn test_memory_store_rank_mismatch_scalar() {
    let err = MemoryStore::new(vec![("s", Array::scalar(1.0f32))]).unwrap_err();
    assert_eq!(
        err,
        SampleKvError::RankMismatch {
            expected: 1,
            actual: 0
        }
    );
}

#[test]
fn test_memory_store_shape_mismatch() {
    let a = create_test_array(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = create_test_array(vec![0.0, 1.0, 0.0], &[3, 1]);
    match MemoryStore::new(vec![("a", a), ("b", b)]).unwrap_err() {
        SampleKvError::ShapeMismatch { expected, actual, .. } => {
            assert_eq!(expected, vec![2]);
            assert_eq!(actual, vec![3]);
        }
        other => panic!("Expected ShapeMismatch error, got {:?}", other),
    }
}

#[test]
fn test_memory_store_duplicate_key() {
    let a = create_test_array(vec![1.0], &[1]);
    let err = MemoryStore::new(vec![("a", a.clone()), ("a", a)]).unwrap_err();
    assert!(matches!(err, SampleKvError::InvalidConfig(_)));
}

#[test]
fn test_memory_store_fetch() {
    let store = xy_store();
    let x1 = store.fetch("X", 1).unwrap();
    assert_eq!(x1.shape(), &[2]);
    assert_eq!(x1.as_slice::<f32>().unwrap(), &[3.0, 4.0]);
    let y2 = store.fetch("y", 2).unwrap();
    assert_eq!(y2.rank(), 0);
    assert_eq!(y2.as_slice::<i64>().unwrap(), &[30]);
}

#[test]
fn test_memory_store_fetch_errors() {
    let store = xy_store();
    assert_eq!(
        store.fetch("X", 3).unwrap_err(),
        SampleKvError::OutOfRange { index: 3, len: 3 }
    );
    assert_eq!(
        store.fetch("z", 0).unwrap_err(),
        SampleKvError::UnknownKey {
            key: "z".to_string()
        }
    );
}

#[test]
fn test_memory_store_fetch_range() {
    let store = xy_store();
    let x = store.fetch_range("X", 1, 3).unwrap();
    assert_eq!(x.shape(), &[2, 2]);
    assert_eq!(x.as_slice::<f32>().unwrap(), &[3.0, 4.0, 5.0, 6.0]);
    assert!(store.fetch_range("X", 2, 4).is_err());
}

#[test]
fn test_memory_store_fetch_sample() {
    let store = xy_store();
    let sample = store.fetch_sample(0).unwrap();
    assert_eq!(sample.len(), 2);
    assert_eq!(sample["X"].as_slice::<f32>().unwrap(), &[1.0, 2.0]);
    assert_eq!(sample["y"].as_slice::<i64>().unwrap(), &[10]);
}

#[test]
fn test_memory_store_closed() {
    let store = xy_store();
    store.close();
    store.close();
    assert!(store.is_closed());
    assert_eq!(store.fetch("X", 0).unwrap_err(), SampleKvError::Closed);
    assert_eq!(store.fetch("nope", 99).unwrap_err(), SampleKvError::Closed);
    assert_eq!(store.fetch_range("X", 0, 1).unwrap_err(), SampleKvError::Closed);
    // Metadata stays readable.
    assert_eq!(store.len(), 3);
}

#[test]
fn test_memory_store_display() {
    let store = xy_store();
    assert_eq!(
        store.to_string(),
        "MemoryStore(memory, 3 samples) [X: f32[2], y: i64[]]"
    );
}
