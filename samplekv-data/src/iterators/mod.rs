//! Batch iterators over a [`SampleStore`](crate::store::SampleStore).
//!
//! * [`SimpleBatchIterator`]: epoch scan in identity or shuffled order.
//! * [`SequentialBatchIterator`]: epoch scan in storage order using
//!   contiguous range reads.
//! * [`StochasticBatchIterator`]: endless uniform sampling with replacement.
//! * [`ThreadSafeIterator`]: shares any of the above between threads.
//! * [`MapBatches`] / [`SharedMapBatches`]: post-process batches.

pub mod kind;
pub mod mapped;
pub mod sequential;
pub mod simple;
pub mod stochastic;
pub mod thread_safe;
pub mod traits;

pub use kind::BatchIterator;
pub use mapped::{MapBatches, SharedMapBatches};
pub use sequential::SequentialBatchIterator;
pub use simple::SimpleBatchIterator;
pub use stochastic::StochasticBatchIterator;
pub use thread_safe::ThreadSafeIterator;
pub use traits::BatchSource;

use samplekv_core::{Result, SampleKvError};
use std::collections::HashSet;
use std::sync::Arc;

use crate::store::SampleStore;

/// Checks the requested keys against the store and freezes their order.
///
/// # Errors
///
/// `Closed` if the store is closed, `InvalidConfig` if `keys` is empty or
/// repeats a key, or the store holds no samples, `UnknownKey` if a key is not
/// stored.
pub(crate) fn resolve_keys<S, I, K>(store: &S, keys: I) -> Result<Arc<[String]>>
where
    S: SampleStore + ?Sized,
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    if store.is_closed() {
        return Err(SampleKvError::Closed);
    }
    if store.is_empty() {
        return Err(SampleKvError::InvalidConfig(
            "cannot iterate over an empty store".to_string(),
        ));
    }
    let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
    if keys.is_empty() {
        return Err(SampleKvError::InvalidConfig(
            "at least one key must be requested".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for key in &keys {
        if !store.contains_key(key) {
            return Err(SampleKvError::unknown_key(key.clone()));
        }
        if !seen.insert(key.as_str()) {
            return Err(SampleKvError::InvalidConfig(format!(
                "key '{}' requested twice",
                key
            )));
        }
    }
    Ok(keys.into())
}
