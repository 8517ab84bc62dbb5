//! Anchoring minute-of-day offsets to concrete instants, with DST policies.
//!
//! Availability windows are wall-clock minutes in the host's zone. On days with a
//! DST transition some wall-clock times do not exist (spring forward) and some
//! exist twice (fall back). The policy decides what a window start means then.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// Far enough back to land before any real-world transition gap.
const GAP_LOOKBACK_HOURS: i64 = 3;

/// Policy for wall-clock times that fall on a DST transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Move a nonexistent time forward by the length of the gap
    /// (02:30 during a 02:00→03:00 spring-forward becomes 03:30).
    /// Ambiguous times take the earlier instant.
    #[default]
    ShiftForward,
    /// Nonexistent times produce no instant; ambiguous ones take the earlier.
    Skip,
}

/// Attach `minute_of_day` to `date` in `tz`.
///
/// `minute_of_day` may be 1440, meaning midnight at the end of `date`.
/// Returns `None` when the policy rejects the local time or the date overflows.
pub fn anchor(date: NaiveDate, minute_of_day: u32, tz: Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
    let local = date
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::minutes(i64::from(minute_of_day)))?;
    resolve_local(&local, tz, policy)
}

/// Resolve a wall-clock datetime in `tz` according to `policy`.
pub fn resolve_local(local: &NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                // Read the wall clock with the offset in force before the gap.
                let before = local.checked_sub_signed(Duration::hours(GAP_LOOKBACK_HOURS))?;
                let offset = tz.offset_from_local_datetime(&before).earliest()?.fix();
                let utc = local.checked_sub_signed(Duration::seconds(i64::from(
                    offset.local_minus_utc(),
                )))?;
                Some(tz.from_utc_datetime(&utc))
            }
        },
    }
}
