use samplekv_core::Array;

// Helper to build a row-major f32 array holding 0, 1, 2, ...
// Added allow(dead_code) because usage across different test crates isn't detected easily.
#[allow(dead_code)]
pub(crate) fn arange_f32(shape: Vec<usize>) -> Array {
    let numel: usize = shape.iter().product();
    Array::new((0..numel).map(|v| v as f32).collect::<Vec<f32>>(), shape)
        .expect("Test array creation failed")
}
