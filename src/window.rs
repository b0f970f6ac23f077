//! Window Partitioner
//!
//! Splits `n` ordered records into contiguous, non-overlapping windows of a
//! fixed size. Only the final window may be shorter.
use crate::errors::EvalError;
use crate::utils::validate_positive_int_parameter;
use std::ops::Range;

/// A half open index range `[start, stop)` over the record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Position of this window in the partition.
    pub index: usize,
    pub start: usize,
    pub stop: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop == self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }
}

/// The partition of `[0, n)` into windows of size `window`.
///
/// Iterating is lazy and may be repeated any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    n: usize,
    window: usize,
}

impl Partition {
    /// * `n` - Number of records.
    /// * `window` - Records per window, must be positive.
    pub fn new(n: usize, window: usize) -> Result<Self, EvalError> {
        validate_positive_int_parameter(window, "window")?;
        Ok(Partition { n, window })
    }

    /// Number of windows, zero when there are no records.
    pub fn len(&self) -> usize {
        self.n.div_ceil(self.window)
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn window_size(&self) -> usize {
        self.window
    }

    pub fn n_records(&self) -> usize {
        self.n
    }

    pub fn iter(&self) -> Windows {
        Windows {
            partition: *self,
            next_start: 0,
            index: 0,
        }
    }
}

impl IntoIterator for &Partition {
    type Item = Window;
    type IntoIter = Windows;

    fn into_iter(self) -> Windows {
        self.iter()
    }
}

/// Iterator over the windows of a `Partition`, in ascending order.
#[derive(Debug, Clone)]
pub struct Windows {
    partition: Partition,
    next_start: usize,
    index: usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.next_start >= self.partition.n {
            return None;
        }
        let start = self.next_start;
        let stop = usize::min(start + self.partition.window, self.partition.n);
        let w = Window {
            index: self.index,
            start,
            stop,
        };
        self.next_start = stop;
        self.index += 1;
        Some(w)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.partition.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows {}

/// Windows of `window` records covering `[0, n_rows)`.
pub fn sliding_windows(n_rows: usize, window: usize) -> Result<Windows, EvalError> {
    Ok(Partition::new(n_rows, window)?.iter())
}
