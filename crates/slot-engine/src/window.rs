//! Recurring daily availability windows, in minutes after local midnight.

use crate::error::{Result, SlotError};
use crate::interval::{merge_intervals, TimeRange};

/// Minutes in a day; the latest a window may end.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A recurring daily opening `[start_minute, end_minute)` in the host's zone.
///
/// Windows never cross midnight: `0 <= start_minute < end_minute <= 1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvailabilityWindow {
    range: TimeRange<u32>,
}

impl AvailabilityWindow {
    /// 08:00 to 17:00.
    pub const BUSINESS_HOURS: AvailabilityWindow = AvailabilityWindow {
        range: TimeRange {
            start: 480,
            end: 1020,
        },
    };

    /// # Errors
    /// Returns [`SlotError::InvalidWindow`] if the window is empty, reversed, or
    /// runs past midnight.
    pub fn new(start_minute: u32, end_minute: u32) -> Result<Self> {
        if start_minute >= end_minute || end_minute > MINUTES_PER_DAY {
            return Err(SlotError::InvalidWindow(format!(
                "{}..{} (expected 0 <= start < end <= {})",
                start_minute, end_minute, MINUTES_PER_DAY
            )));
        }
        let range = TimeRange::new(start_minute, end_minute)?;
        Ok(Self { range })
    }

    pub fn start_minute(&self) -> u32 {
        self.range.start()
    }

    pub fn end_minute(&self) -> u32 {
        self.range.end()
    }

    pub fn length_minutes(&self) -> u32 {
        self.range.end() - self.range.start()
    }

    /// Whether a session of `minutes` starting at `start_minute` ends inside this window.
    pub fn fits(&self, start_minute: u32, minutes: u32) -> bool {
        start_minute >= self.start_minute()
            && start_minute.saturating_add(minutes) <= self.end_minute()
    }
}

/// Merge overlapping or touching windows into a sorted, disjoint list.
pub fn merge_windows(windows: &[AvailabilityWindow]) -> Vec<AvailabilityWindow> {
    let ranges: Vec<TimeRange<u32>> = windows.iter().map(|w| w.range).collect();
    // Merging valid windows keeps every bound inside 0..=1440 with start < end.
    merge_intervals(&ranges)
        .into_iter()
        .map(|range| AvailabilityWindow { range })
        .collect()
}

/// Merge windows and keep only those long enough to host one session.
pub fn bookable_windows(windows: &[AvailabilityWindow], session_minutes: u32) -> Vec<AvailabilityWindow> {
    merge_windows(windows)
        .into_iter()
        .filter(|w| w.length_minutes() >= session_minutes)
        .collect()
}
