// samplekv-data/src/iterators/kind.rs

use samplekv_core::Result;

use super::sequential::SequentialBatchIterator;
use super::simple::SimpleBatchIterator;
use super::stochastic::StochasticBatchIterator;
use super::traits::{next_or_stop, BatchSource};
use crate::batch::Batch;
use crate::config::IteratorMode;
use crate::store::SampleStore;

/// Any of the three batch iterators, chosen at runtime.
#[derive(Debug)]
pub enum BatchIterator<S: SampleStore + ?Sized = dyn SampleStore> {
    Simple(SimpleBatchIterator<S>),
    Sequential(SequentialBatchIterator<S>),
    Stochastic(StochasticBatchIterator<S>),
}

impl<S: SampleStore + ?Sized> BatchIterator<S> {
    pub fn mode(&self) -> IteratorMode {
        match self {
            BatchIterator::Simple(_) => IteratorMode::Simple,
            BatchIterator::Sequential(_) => IteratorMode::Sequential,
            BatchIterator::Stochastic(_) => IteratorMode::Stochastic,
        }
    }

    fn source(&self) -> &dyn BatchSource {
        match self {
            BatchIterator::Simple(it) => it,
            BatchIterator::Sequential(it) => it,
            BatchIterator::Stochastic(it) => it,
        }
    }

    fn source_mut(&mut self) -> &mut dyn BatchSource {
        match self {
            BatchIterator::Simple(it) => it,
            BatchIterator::Sequential(it) => it,
            BatchIterator::Stochastic(it) => it,
        }
    }
}

impl<S: SampleStore + ?Sized> BatchSource for BatchIterator<S> {
    fn next_batch(&mut self) -> Result<Batch> {
        self.source_mut().next_batch()
    }

    fn keys(&self) -> &[String] {
        self.source().keys()
    }

    fn batch_size(&self) -> usize {
        self.source().batch_size()
    }

    fn end_of_dataset(&self) -> bool {
        self.source().end_of_dataset()
    }

    fn batches_per_epoch(&self) -> Option<usize> {
        self.source().batches_per_epoch()
    }
}

impl<S: SampleStore + ?Sized> Iterator for BatchIterator<S> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        next_or_stop(self.next_batch())
    }
}

impl<S: SampleStore + ?Sized> From<SimpleBatchIterator<S>> for BatchIterator<S> {
    fn from(it: SimpleBatchIterator<S>) -> Self {
        BatchIterator::Simple(it)
    }
}

impl<S: SampleStore + ?Sized> From<SequentialBatchIterator<S>> for BatchIterator<S> {
    fn from(it: SequentialBatchIterator<S>) -> Self {
        BatchIterator::Sequential(it)
    }
}

impl<S: SampleStore + ?Sized> From<StochasticBatchIterator<S>> for BatchIterator<S> {
    fn from(it: StochasticBatchIterator<S>) -> Self {
        BatchIterator::Stochastic(it)
    }
}
