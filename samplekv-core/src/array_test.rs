// samplekv-core/src/array_test.rs

use super::*;

fn arange_f32(n: usize, shape: Vec<usize>) -> Array {
    Array::new((0..n).map(|v| v as f32).collect::<Vec<f32>>(), shape).unwrap()
}

#[test]
fn test_new_checks_element_count() {
    let err = Array::new(vec![1.0f32, 2.0, 3.0], vec![2, 2]).unwrap_err();
    match err {
        SampleKvError::ArrayCreationError { data_len, shape } => {
            assert_eq!(data_len, 3);
            assert_eq!(shape, vec![2, 2]);
        }
        _ => panic!("Expected ArrayCreationError"),
    }
}

#[test]
fn test_metadata() {
    let a = arange_f32(6, vec![3, 2]);
    assert_eq!(a.dtype(), DType::F32);
    assert_eq!(a.shape(), &[3, 2]);
    assert_eq!(a.rank(), 2);
    assert_eq!(a.numel(), 6);
    assert_eq!(a.nbytes(), 24);
}

#[test]
fn test_scalar_has_rank_zero() {
    let s = Array::scalar(7i64);
    assert_eq!(s.rank(), 0);
    assert_eq!(s.numel(), 1);
    assert_eq!(s.as_slice::<i64>().unwrap(), &[7]);
}

#[test]
fn test_as_slice_wrong_dtype() {
    let a = arange_f32(2, vec![2]);
    match a.as_slice::<i32>() {
        Err(SampleKvError::DTypeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, DType::I32);
            assert_eq!(actual, DType::F32);
        }
        other => panic!("Expected DTypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_select_drops_leading_axis() {
    let a = arange_f32(6, vec![3, 2]);
    let row = a.select(1).unwrap();
    assert_eq!(row.shape(), &[2]);
    assert_eq!(row.as_slice::<f32>().unwrap(), &[2.0, 3.0]);
}

#[test]
fn test_select_on_vector_gives_scalar() {
    let a = Array::new(vec![10i32, 20, 30], vec![3]).unwrap();
    let s = a.select(2).unwrap();
    assert_eq!(s.rank(), 0);
    assert_eq!(s.as_slice::<i32>().unwrap(), &[30]);
}

#[test]
fn test_select_out_of_range() {
    let a = arange_f32(6, vec![3, 2]);
    assert_eq!(
        a.select(3).unwrap_err(),
        SampleKvError::OutOfRange { index: 3, len: 3 }
    );
}

#[test]
fn test_select_on_scalar_is_rank_mismatch() {
    let s = Array::scalar(1.0f64);
    assert_eq!(
        s.select(0).unwrap_err(),
        SampleKvError::RankMismatch {
            expected: 1,
            actual: 0
        }
    );
}

#[test]
fn test_narrow_keeps_leading_axis() {
    let a = arange_f32(8, vec![4, 2]);
    let n = a.narrow(1, 3).unwrap();
    assert_eq!(n.shape(), &[2, 2]);
    assert_eq!(n.as_slice::<f32>().unwrap(), &[2.0, 3.0, 4.0, 5.0]);

    let empty = a.narrow(2, 2).unwrap();
    assert_eq!(empty.shape(), &[0, 2]);
    assert_eq!(empty.numel(), 0);
}

#[test]
fn test_le_bytes_round_trip_u8_image() {
    let pixels: Vec<u8> = (0..12).collect();
    let a = Array::new(pixels, vec![2, 2, 3]).unwrap();
    let bytes = a.to_le_bytes();
    assert_eq!(bytes.len(), 12);
    let back = Array::from_le_bytes(DType::U8, vec![2, 2, 3], &bytes).unwrap();
    assert_eq!(back, a);
}

#[test]
fn test_from_le_bytes_wrong_length() {
    let err = Array::from_le_bytes(DType::F64, vec![2], &[0u8; 12]).unwrap_err();
    assert!(matches!(err, SampleKvError::ArrayCreationError { .. }));
}

#[test]
fn test_to_f64_vec_from_bool() {
    let a = Array::new(vec![true, false, true], vec![3]).unwrap();
    assert_eq!(a.to_f64_vec(), vec![1.0, 0.0, 1.0]);
}

#[test]
fn test_clone_shares_buffer() {
    let a = arange_f32(4, vec![4]);
    let b = a.clone();
    match (a.data(), b.data()) {
        (ArrayData::F32(x), ArrayData::F32(y)) => assert!(Arc::ptr_eq(x, y)),
        _ => panic!("Expected F32 buffers"),
    }
}
