// samplekv-data/src/samplers/epoch_order.rs

use log::debug;

use super::random_source::RandomSource;

/// The order in which one epoch visits the samples of a store.
///
/// `Identity` is never materialized. `Shuffled` keeps the current permutation
/// and the random source it is drawn from; [`begin_epoch`](EpochOrder::begin_epoch)
/// replaces it with a fresh permutation of the identity order.
#[derive(Debug, Clone)]
pub enum EpochOrder {
    Identity {
        len: usize,
    },
    Shuffled {
        indices: Vec<usize>,
        rng: RandomSource,
        draws: usize,
    },
}

impl EpochOrder {
    pub fn identity(len: usize) -> Self {
        EpochOrder::Identity { len }
    }

    /// A shuffled order over `len` samples. No permutation is drawn until the
    /// first call to [`begin_epoch`](EpochOrder::begin_epoch).
    pub fn shuffled(len: usize, rng: RandomSource) -> Self {
        EpochOrder::Shuffled {
            indices: (0..len).collect(),
            rng,
            draws: 0,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EpochOrder::Identity { len } => *len,
            EpochOrder::Shuffled { indices, .. } => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_shuffled(&self) -> bool {
        matches!(self, EpochOrder::Shuffled { .. })
    }

    /// Prepares the order for a new epoch.
    ///
    /// Identity orders are left as they are. Shuffled orders are reset to
    /// `0..len` and permuted, so each permutation depends only on the state
    /// of the random source.
    pub fn begin_epoch(&mut self) {
        if let EpochOrder::Shuffled {
            indices,
            rng,
            draws,
        } = self
        {
            for (slot, value) in indices.iter_mut().enumerate() {
                *value = slot;
            }
            rng.shuffle(indices);
            *draws += 1;
            debug!(
                "EpochOrder: drew permutation #{} over {} samples",
                draws,
                indices.len()
            );
        }
    }

    /// The sample indices at positions `[start, end)` of the current order.
    pub fn indices(&self, start: usize, end: usize) -> Vec<usize> {
        match self {
            EpochOrder::Identity { .. } => (start..end).collect(),
            EpochOrder::Shuffled { indices, .. } => indices[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "epoch_order_test.rs"]
mod tests;
