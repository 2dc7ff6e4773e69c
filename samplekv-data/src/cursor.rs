// samplekv-data/src/cursor.rs

use samplekv_core::{Result, SampleKvError};

/// The positions covered by one batch, as computed by [`Cursor::peek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStep {
    /// First position of the batch in the epoch order.
    pub start: usize,
    /// One past the last position.
    pub end: usize,
    /// The batch completes the epoch.
    pub end_of_dataset: bool,
}

impl CursorStep {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The batch is the first of its epoch.
    pub fn starts_epoch(&self) -> bool {
        self.start == 0
    }
}

/// Position of an iterator within the current epoch.
///
/// Advancing is split in two: [`peek`](Cursor::peek) computes the next step
/// without changing anything, and [`commit`](Cursor::commit) applies it once
/// the batch has been assembled. A batch whose fetch failed is simply never
/// committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
    batch_size: usize,
    dataset_len: usize,
    endless: bool,
    end_of_dataset: bool,
    exhausted: bool,
    epoch: usize,
}

impl Cursor {
    /// Creates a cursor at the start of epoch 0.
    ///
    /// # Errors
    ///
    /// `SampleKvError::InvalidConfig` if `batch_size` or `dataset_len` is zero.
    pub fn new(dataset_len: usize, batch_size: usize, endless: bool) -> Result<Self> {
        if batch_size == 0 {
            return Err(SampleKvError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if dataset_len == 0 {
            return Err(SampleKvError::InvalidConfig(
                "cannot iterate over an empty store".to_string(),
            ));
        }
        Ok(Self {
            position: 0,
            batch_size,
            dataset_len,
            endless,
            end_of_dataset: false,
            exhausted: false,
            epoch: 0,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    pub fn is_endless(&self) -> bool {
        self.endless
    }

    /// Whether the last committed batch completed an epoch.
    pub fn end_of_dataset(&self) -> bool {
        self.end_of_dataset
    }

    /// A non-endless cursor that finished its epoch.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of the epoch the next batch belongs to.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn at_epoch_start(&self) -> bool {
        !self.exhausted && self.position == 0
    }

    /// `ceil(dataset_len / batch_size)`.
    pub fn batches_per_epoch(&self) -> usize {
        self.dataset_len.div_ceil(self.batch_size)
    }

    /// Computes the next step.
    ///
    /// # Errors
    ///
    /// `SampleKvError::StopIteration` once a non-endless cursor is exhausted.
    pub fn peek(&self) -> Result<CursorStep> {
        if self.exhausted {
            return Err(SampleKvError::StopIteration);
        }
        let end = (self.position + self.batch_size).min(self.dataset_len);
        Ok(CursorStep {
            start: self.position,
            end,
            end_of_dataset: end == self.dataset_len,
        })
    }

    /// Applies a step previously returned by [`peek`](Cursor::peek).
    pub fn commit(&mut self, step: CursorStep) {
        debug_assert_eq!(step.start, self.position);
        self.end_of_dataset = step.end_of_dataset;
        if step.end_of_dataset {
            self.epoch += 1;
            if self.endless {
                self.position = 0;
            } else {
                // Terminal state: the position stays at the end.
                self.position = self.dataset_len;
                self.exhausted = true;
            }
        } else {
            self.position = step.end;
        }
    }

    /// `peek` followed by `commit`.
    pub fn advance(&mut self) -> Result<CursorStep> {
        let step = self.peek()?;
        self.commit(step);
        Ok(step)
    }
}

#[cfg(test)]
#[path = "cursor_test.rs"]
mod tests;
