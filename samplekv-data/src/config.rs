// samplekv-data/src/config.rs

//! Declarative iterator configuration.
//!
//! An [`IteratorConfig`] can be written in TOML, overridden from `SAMPLEKV_*`
//! environment variables, validated, and then built against a store:
//!
//! ```toml
//! mode = "simple"
//! keys = ["X", "y"]
//! batch_size = 64
//! shuffle = true
//! seed = 42
//! ```

use log::warn;
use samplekv_core::{Result, SampleKvError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::iterators::{
    BatchIterator, SequentialBatchIterator, SimpleBatchIterator, StochasticBatchIterator,
    ThreadSafeIterator,
};
use crate::samplers::RandomSource;
use crate::store::SampleStore;

/// Prefix of the environment variables read by
/// [`IteratorConfig::with_env_overrides`].
pub const ENV_PREFIX: &str = "SAMPLEKV_";

/// Traversal policy of a batch iterator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IteratorMode {
    /// Epoch scan, in identity or shuffled order.
    #[default]
    Simple,
    /// Epoch scan in storage order with contiguous reads.
    Sequential,
    /// Uniform sampling with replacement, no epochs.
    Stochastic,
}

impl IteratorMode {
    pub fn name(&self) -> &'static str {
        match self {
            IteratorMode::Simple => "simple",
            IteratorMode::Sequential => "sequential",
            IteratorMode::Stochastic => "stochastic",
        }
    }
}

impl fmt::Display for IteratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IteratorMode {
    type Err = SampleKvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(IteratorMode::Simple),
            "sequential" => Ok(IteratorMode::Sequential),
            "stochastic" => Ok(IteratorMode::Stochastic),
            other => Err(SampleKvError::InvalidConfig(format!(
                "unknown iterator mode '{}'",
                other
            ))),
        }
    }
}

/// Everything needed to build a batch iterator over a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IteratorConfig {
    pub mode: IteratorMode,
    /// Keys to read, in output order.
    pub keys: Vec<String>,
    pub batch_size: usize,
    /// Shuffle each epoch (simple mode only).
    pub shuffle: bool,
    /// Start a new epoch instead of stopping (simple and sequential modes).
    pub endless: bool,
    /// Seed of the random source; required when shuffling or sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for IteratorConfig {
    fn default() -> Self {
        Self {
            mode: IteratorMode::Simple,
            keys: Vec::new(),
            batch_size: 32,
            shuffle: false,
            endless: true,
            seed: None,
        }
    }
}

impl FromStr for IteratorConfig {
    type Err = SampleKvError;

    /// Parses a configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| {
            SampleKvError::InvalidConfig(format!("failed to parse TOML config: {}", e))
        })
    }
}

impl IteratorConfig {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: IteratorMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_endless(mut self, endless: bool) -> Self {
        self.endless = endless;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Loads and validates a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SampleKvError::io(path, e))?;
        let config: Self = content.parse()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `SAMPLEKV_*` environment overrides.
    ///
    /// Recognized variables: `SAMPLEKV_MODE`, `SAMPLEKV_KEYS` (comma
    /// separated), `SAMPLEKV_BATCH_SIZE`, `SAMPLEKV_SHUFFLE`,
    /// `SAMPLEKV_ENDLESS` and `SAMPLEKV_SEED`. Values that do not parse are
    /// ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(format!("{}{}", ENV_PREFIX, name)).ok())
    }

    /// Applies overrides looked up by unprefixed variable name (`"MODE"`,
    /// `"BATCH_SIZE"`, ...).
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("MODE") {
            match val.parse() {
                Ok(mode) => self.mode = mode,
                Err(e) => warn!("IteratorConfig: ignoring {}MODE: {}", ENV_PREFIX, e),
            }
        }
        if let Some(val) = lookup("KEYS") {
            self.keys = val
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(val) = lookup("BATCH_SIZE") {
            match val.trim().parse() {
                Ok(v) => self.batch_size = v,
                Err(_) => warn!("IteratorConfig: ignoring {}BATCH_SIZE={:?}", ENV_PREFIX, val),
            }
        }
        if let Some(val) = lookup("SHUFFLE") {
            match val.trim().parse() {
                Ok(v) => self.shuffle = v,
                Err(_) => warn!("IteratorConfig: ignoring {}SHUFFLE={:?}", ENV_PREFIX, val),
            }
        }
        if let Some(val) = lookup("ENDLESS") {
            match val.trim().parse() {
                Ok(v) => self.endless = v,
                Err(_) => warn!("IteratorConfig: ignoring {}ENDLESS={:?}", ENV_PREFIX, val),
            }
        }
        if let Some(val) = lookup("SEED") {
            match val.trim().parse() {
                Ok(v) => self.seed = Some(v),
                Err(_) => warn!("IteratorConfig: ignoring {}SEED={:?}", ENV_PREFIX, val),
            }
        }
        self
    }

    /// Whether the configured iterator consumes randomness.
    pub fn needs_randomness(&self) -> bool {
        match self.mode {
            IteratorMode::Simple => self.shuffle,
            IteratorMode::Sequential => false,
            IteratorMode::Stochastic => true,
        }
    }

    /// Checks the configuration on its own, without a store.
    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(SampleKvError::InvalidConfig(
                "keys must not be empty".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(SampleKvError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.shuffle && self.mode != IteratorMode::Simple {
            return Err(SampleKvError::InvalidConfig(format!(
                "shuffle is only supported in simple mode, not {}",
                self.mode
            )));
        }
        if self.needs_randomness() && self.seed.is_none() {
            return Err(SampleKvError::InvalidConfig(format!(
                "{} mode{} needs a seed",
                self.mode,
                if self.shuffle { " with shuffle" } else { "" }
            )));
        }
        Ok(())
    }

    fn random_source(&self) -> Result<RandomSource> {
        self.seed
            .map(RandomSource::seed_from_u64)
            .ok_or_else(|| SampleKvError::InvalidConfig("missing seed".to_string()))
    }

    /// Validates the configuration and builds the iterator over `store`.
    pub fn build<S: SampleStore + ?Sized>(&self, store: Arc<S>) -> Result<BatchIterator<S>> {
        self.validate()?;
        let keys = self.keys.iter().cloned();
        let iterator: BatchIterator<S> = match self.mode {
            IteratorMode::Simple if self.shuffle => SimpleBatchIterator::shuffled(
                store,
                keys,
                self.batch_size,
                self.endless,
                self.random_source()?,
            )?
            .into(),
            IteratorMode::Simple => {
                SimpleBatchIterator::new(store, keys, self.batch_size, self.endless)?.into()
            }
            IteratorMode::Sequential => {
                SequentialBatchIterator::new(store, keys, self.batch_size, self.endless)?.into()
            }
            IteratorMode::Stochastic => {
                if !self.endless {
                    warn!("IteratorConfig: endless = false has no effect in stochastic mode");
                }
                StochasticBatchIterator::new(store, keys, self.batch_size, self.random_source()?)?
                    .into()
            }
        };
        Ok(iterator)
    }

    /// Like [`build`](IteratorConfig::build), wrapped for sharing between
    /// threads.
    pub fn build_thread_safe<S: SampleStore + ?Sized>(
        &self,
        store: Arc<S>,
    ) -> Result<ThreadSafeIterator<BatchIterator<S>>> {
        Ok(ThreadSafeIterator::new(self.build(store)?))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
