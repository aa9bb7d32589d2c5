//! Chronological train/test partition.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitLabel {
    Train,
    Test,
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitLabel::Train => write!(f, "train"),
            SplitLabel::Test => write!(f, "test"),
        }
    }
}

/// A contiguous prefix (train) and the remaining suffix (test).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split<'a, T> {
    pub train: &'a [T],
    pub test: &'a [T],
}

/// floor(len × ratio), clamped into `0..=len`. Non-finite ratios give 0.
pub fn split_index(len: usize, train_ratio: f64) -> usize {
    if !train_ratio.is_finite() || train_ratio <= 0.0 {
        return 0;
    }
    let idx = (len as f64 * train_ratio).floor();
    if idx >= len as f64 {
        len
    } else {
        idx as usize
    }
}

/// Never fails: degenerate ratios or an empty series yield empty halves.
pub fn split<T>(items: &[T], train_ratio: f64) -> Split<'_, T> {
    let (train, test) = items.split_at(split_index(items.len(), train_ratio));
    Split { train, test }
}
