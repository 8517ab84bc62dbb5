//! Stored schedule templates: what a host offers, independent of any one query.

use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::weekly::WeeklyMask;
use crate::window::{merge_windows, AvailabilityWindow};

/// Session length used when a template does not specify one.
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

/// A host's recurring offer: session length, spacing, zone, daily windows and
/// working weekdays.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleTemplate {
    pub session_minutes: u32,
    /// Minutes left free between two consecutive sessions.
    pub gap_minutes: u32,
    pub timezone: Tz,
    /// Kept merged and sorted by [`ScheduleTemplate::with_windows`].
    pub windows: Vec<AvailabilityWindow>,
    pub weekly_mask: WeeklyMask,
    pub description: String,
}

impl Default for ScheduleTemplate {
    fn default() -> Self {
        Self {
            session_minutes: DEFAULT_SESSION_MINUTES,
            gap_minutes: 0,
            timezone: Tz::UTC,
            windows: vec![AvailabilityWindow::BUSINESS_HOURS],
            weekly_mask: WeeklyMask::WEEKDAYS,
            description: String::new(),
        }
    }
}

impl ScheduleTemplate {
    /// Replace the daily windows, merging overlaps.
    pub fn with_windows(mut self, windows: &[AvailabilityWindow]) -> Self {
        self.windows = merge_windows(windows);
        self
    }

    /// Parse an IANA zone name such as `"Europe/Berlin"` or `"UTC"`.
    pub fn with_timezone(mut self, timezone: &str) -> Result<Self> {
        self.timezone = parse_timezone(timezone)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_minutes == 0 {
            return Err(SlotError::InvalidRequest(
                "session duration must be at least one minute".to_string(),
            ));
        }
        if self.windows.is_empty() {
            return Err(SlotError::InvalidRequest(
                "template has no availability windows".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse an IANA timezone name. `"Z"` is accepted as UTC.
///
/// # Errors
/// Returns [`SlotError::InvalidTimezone`] if the name is not a known zone.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    if name == "Z" {
        return Ok(Tz::UTC);
    }
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}
