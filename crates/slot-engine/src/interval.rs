//! Interval normalization.
//!
//! Sorts ranges by start, then folds overlapping or touching ranges together so
//! the result is the minimal sorted list of disjoint ranges covering the same
//! span. Works over any totally ordered point type: minute-of-day offsets for
//! availability windows, UTC instants for occupied periods.

use std::fmt::Debug;

use crate::error::{Result, SlotError};

/// A closed-open range `[start, end)` on a single ordered timeline.
///
/// Outside this crate the only constructor is [`TimeRange::new`], which rejects
/// `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange<T> {
    pub(crate) start: T,
    pub(crate) end: T,
}

impl<T: Ord + Copy + Debug> TimeRange<T> {
    /// Build a range, failing with [`SlotError::InvalidInterval`] when `start > end`.
    pub fn new(start: T, end: T) -> Result<Self> {
        if start > end {
            return Err(SlotError::InvalidInterval(format!(
                "start {:?} is after end {:?}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// True when the two ranges share at least one point of positive length.
    ///
    /// Ranges that only touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Merge overlapping or touching ranges.
///
/// Returns a sorted, non-overlapping list. Touching ranges (`prev.end >= next.start`)
/// collapse into one, so `merge_intervals(merge_intervals(x)) == merge_intervals(x)`.
pub fn merge_intervals<T: Ord + Copy + Debug>(ranges: &[TimeRange<T>]) -> Vec<TimeRange<T>> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    // Sort by start time (then by end time for stability).
    sorted.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TimeRange<T>> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Validate raw `(start, end)` pairs and merge them.
///
/// # Errors
/// Returns [`SlotError::InvalidInterval`] for the first pair with `start > end`.
/// Nothing is merged in that case.
pub fn merge_pairs<T: Ord + Copy + Debug>(pairs: &[(T, T)]) -> Result<Vec<TimeRange<T>>> {
    let ranges = pairs
        .iter()
        .map(|&(start, end)| TimeRange::new(start, end))
        .collect::<Result<Vec<_>>>()?;
    Ok(merge_intervals(&ranges))
}
