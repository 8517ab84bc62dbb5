//! Forward-only conflict detection against one merged occupied source.
//!
//! Candidates are visited in increasing start order, so the cursor never has to
//! move backward: anything that ended at or before the current candidate's start
//! cannot touch any later candidate either. Adjacent intervals (one ends exactly
//! when the other starts) are NOT conflicts.

use chrono::{DateTime, Utc};

use crate::interval::TimeRange;

/// Two-pointer cursor over a sorted, merged interval list.
#[derive(Debug, Clone)]
pub struct OccupiedCursor<'a> {
    intervals: &'a [TimeRange<DateTime<Utc>>],
    position: usize,
}

impl<'a> OccupiedCursor<'a> {
    /// `intervals` must be sorted and disjoint, as produced by
    /// [`crate::interval::merge_intervals`].
    pub fn new(intervals: &'a [TimeRange<DateTime<Utc>>]) -> Self {
        Self {
            intervals,
            position: 0,
        }
    }

    /// Return the occupied interval blocking `[start, end)`, if any.
    ///
    /// Skips every interval whose end is at or before `start`, then the candidate
    /// conflicts iff the next remaining interval starts before `end`. An interval
    /// that began before `start` but is still running is kept and reported.
    pub fn blocking(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<&'a TimeRange<DateTime<Utc>>> {
        while self
            .intervals
            .get(self.position)
            .is_some_and(|iv| iv.end() <= start)
        {
            self.position += 1;
        }
        self.intervals
            .get(self.position)
            .filter(|iv| iv.start() < end)
    }

    pub fn conflicts_with(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.blocking(start, end).is_some()
    }

    /// Index of the first interval that may still conflict.
    pub fn position(&self) -> usize {
        self.position
    }
}
