//! Writes a small store file, then reads it back with each iterator mode.
//!
//! Run with `RUST_LOG=debug cargo run --example iterate_store` to see epoch
//! boundaries and permutation draws.

use samplekv_core::ops::cast;
use samplekv_data::{
    store, Array, BatchSource, DType, FieldSpec, IteratorConfig, IteratorMode, Result,
    SampleStore, SharedMapBatches, StoreWriter,
};
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    // 10 samples: a 3-feature vector and a class label.
    let dir = tempfile::tempdir().map_err(|e| samplekv_data::SampleKvError::io(".", e))?;
    let path = dir.path().join("demo.skv");
    let mut writer = StoreWriter::new(vec![
        FieldSpec::new("X", DType::F32, vec![3]),
        FieldSpec::new("y", DType::U8, vec![]),
    ])?;
    let features: Vec<f32> = (0..30).map(|v| v as f32 / 10.0).collect();
    let labels: Vec<u8> = (0..10).map(|i| i % 3).collect();
    writer.put_batch(&[
        ("X", Array::new(features, vec![10, 3])?),
        ("y", Array::new(labels, vec![10])?),
    ])?;
    writer.finish(&path)?;

    let store = Arc::new(store::open(&path)?);
    println!("{}", store);

    println!("\n--- Simple, in order, one epoch ---");
    let simple = IteratorConfig::new(["X", "y"])
        .with_batch_size(4)
        .with_endless(false)
        .build(store.clone())?;
    for batch in simple {
        let batch = batch?;
        println!(
            "indices {:?}  X {:?}  end_of_dataset {}",
            batch.indices(),
            batch.field("X")?.shape(),
            batch.end_of_dataset()
        );
    }

    println!("\n--- Simple, shuffled, endless (two epochs) ---");
    let mut shuffled = IteratorConfig::new(["y"])
        .with_batch_size(4)
        .with_shuffle(true)
        .with_seed(7)
        .build(store.clone())?;
    let per_epoch = shuffled.batches_per_epoch().unwrap_or(0);
    for _ in 0..2 * per_epoch {
        let batch = shuffled.next_batch()?;
        println!("indices {:?}  end_of_dataset {}", batch.indices(), batch.end_of_dataset());
    }

    println!("\n--- Stochastic ---");
    let stochastic = IteratorConfig::new(["y"])
        .with_mode(IteratorMode::Stochastic)
        .with_batch_size(6)
        .with_seed(11)
        .build(store.clone())?;
    for batch in stochastic.take(3) {
        let batch = batch?;
        println!("indices {:?}  y {:?}", batch.indices(), batch.field("y")?.to_vec::<u8>()?);
    }

    println!("\n--- Sequential, shared by 3 threads, labels cast to f32 ---");
    let base = Arc::new(
        IteratorConfig::new(["X", "y"])
            .with_mode(IteratorMode::Sequential)
            .with_batch_size(3)
            .with_endless(false)
            .build_thread_safe(store.clone())?,
    );
    let mapped = Arc::new(SharedMapBatches::new(base, |batch: samplekv_data::Batch| {
        batch.map_field("y", |a| cast(a, DType::F32))
    }));
    let handles: Vec<_> = (0..3)
        .map(|worker| {
            let mapped = Arc::clone(&mapped);
            thread::spawn(move || -> Result<()> {
                for batch in &*mapped {
                    let batch = batch?;
                    println!(
                        "worker {} got indices {:?} labels {:?}",
                        worker,
                        batch.indices(),
                        batch.field("y")?.to_vec::<f32>()?
                    );
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked")?;
    }

    store.close();
    Ok(())
}
