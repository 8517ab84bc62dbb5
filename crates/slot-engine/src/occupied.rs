//! Occupied-time sources.
//!
//! A host is unavailable during intervals that come from independent places:
//! the synced external calendar, confirmed bookings, and temporary holds placed
//! while someone is filling in a booking form. Each source keeps its own list so
//! the scheduler can merge and walk them separately.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::interval::{merge_intervals, TimeRange};

/// Minutes a hold stays active when the caller does not say otherwise.
pub const DEFAULT_HOLD_MINUTES: u32 = 10;

/// Source id used for intervals derived from holds.
pub const HOLD_SOURCE_ID: &str = "holds";

/// A named list of occupied intervals from a single source.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupiedSource {
    /// Opaque identifier for this source (e.g., "calendar", "bookings").
    pub source_id: String,
    pub intervals: Vec<TimeRange<DateTime<Utc>>>,
}

impl OccupiedSource {
    pub fn new(source_id: impl Into<String>, intervals: Vec<TimeRange<DateTime<Utc>>>) -> Self {
        Self {
            source_id: source_id.into(),
            intervals,
        }
    }

    /// Build a source from the holds that are still active at `now`.
    pub fn from_holds(source_id: impl Into<String>, holds: &[Hold], now: DateTime<Utc>) -> Self {
        let intervals = holds
            .iter()
            .filter(|h| h.is_active(now))
            .map(|h| h.range)
            .collect();
        Self::new(source_id, intervals)
    }

    /// This source's intervals, sorted and merged.
    pub fn merged(&self) -> Vec<TimeRange<DateTime<Utc>>> {
        merge_intervals(&self.intervals)
    }
}

/// A temporary lock on a time range that lapses after `expiration_minutes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hold {
    pub range: TimeRange<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expiration_minutes: u32,
}

impl Hold {
    /// # Errors
    /// Returns [`crate::SlotError::InvalidInterval`] when `start > end`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        created_at: DateTime<Utc>,
        expiration_minutes: u32,
    ) -> Result<Self> {
        Ok(Self {
            range: TimeRange::new(start, end)?,
            created_at,
            expiration_minutes,
        })
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(i64::from(self.expiration_minutes))
    }

    /// A hold blocks booking strictly before its expiry instant.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() > now
    }
}
