//! The slot sweep.
//!
//! Walks forward from a start date across a recurring daily template, one
//! candidate session at a time, while advancing one forward-only cursor per
//! occupied source. Candidates that collide with any source are dropped; the
//! rest are emitted until the result cap or the horizon is reached.
//!
//! Wall-clock arithmetic (window minutes, weekday lookup) happens in the host's
//! zone. Overlap checks happen on UTC instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::conflict::OccupiedCursor;
use crate::dst::{anchor, resolve_local, DstPolicy};
use crate::error::{Result, SlotError};
use crate::interval::TimeRange;
use crate::occupied::OccupiedSource;
use crate::template::ScheduleTemplate;
use crate::weekly::{decode_weekly_mask, WeekAvailability};
use crate::window::{bookable_windows, AvailabilityWindow};

/// How far past the start date slots may be offered.
///
/// Measured from the first window's opening on the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Days(u32),
    Months(u32),
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon::Months(3)
    }
}

impl Horizon {
    /// The first instant that is no longer offerable. Calendar days and months
    /// are added to the wall-clock time of `origin`, so a horizon spanning a DST
    /// change still ends at the same local time. An end that lands on a DST
    /// transition resolves like a window start under [`DstPolicy::ShiftForward`].
    ///
    /// Returns `None` only when the calendar overflows.
    pub fn end_from(self, origin: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let local = origin.naive_local();
        let end = match self {
            Horizon::Days(n) => local.checked_add_days(chrono::Days::new(u64::from(n)))?,
            Horizon::Months(n) => local.checked_add_months(chrono::Months::new(n))?,
        };
        resolve_local(&end, origin.timezone(), DstPolicy::ShiftForward)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Days(n) => write!(f, "{}d", n),
            Horizon::Months(n) => write!(f, "{}m", n),
        }
    }
}

impl FromStr for Horizon {
    type Err = SlotError;

    /// Parses `"14d"`, `"14 days"`, `"3m"` or `"3 months"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| SlotError::InvalidRequest(format!("horizon '{}' has no unit", s)))?;
        let (count, unit) = s.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| SlotError::InvalidRequest(format!("horizon '{}' has no count", s)))?;
        match unit.trim() {
            "d" | "day" | "days" => Ok(Horizon::Days(count)),
            "m" | "month" | "months" => Ok(Horizon::Months(count)),
            other => Err(SlotError::InvalidRequest(format!(
                "unknown horizon unit '{}'",
                other
            ))),
        }
    }
}

/// Page size and horizon applied when a caller leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDefaults {
    pub max_results: usize,
    pub horizon: Horizon,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            max_results: 100,
            horizon: Horizon::default(),
        }
    }
}

/// One offered, conflict-free session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Everything one sweep needs.
#[derive(Debug, Clone)]
pub struct SlotRequest {
    /// Stop after this many offered slots.
    pub max_results: usize,
    /// Local date, in `timezone`, the sweep starts on.
    pub start_date: NaiveDate,
    pub horizon: Horizon,
    pub timezone: Tz,
    pub session_minutes: u32,
    pub gap_minutes: u32,
    pub windows: Vec<AvailabilityWindow>,
    /// Raw 7-bit weekday mask, validated when the sweep starts.
    pub weekly_mask: u32,
    /// Independent occupied sources; each is merged on its own.
    pub occupied: Vec<OccupiedSource>,
    pub dst_policy: DstPolicy,
}

impl SlotRequest {
    /// Build a request from a stored template, with no occupied time yet.
    pub fn from_template(
        template: &ScheduleTemplate,
        start_date: NaiveDate,
        defaults: &RequestDefaults,
    ) -> Self {
        Self {
            max_results: defaults.max_results,
            start_date,
            horizon: defaults.horizon,
            timezone: template.timezone,
            session_minutes: template.session_minutes,
            gap_minutes: template.gap_minutes,
            windows: template.windows.clone(),
            weekly_mask: template.weekly_mask.bits(),
            occupied: Vec::new(),
            dst_policy: DstPolicy::default(),
        }
    }

    pub fn with_occupied(mut self, source: OccupiedSource) -> Self {
        self.occupied.push(source);
        self
    }
}

/// Generate the ordered list of offered slots.
///
/// Output is strictly increasing by start, never overlapping, never longer than
/// `max_results`, and never overlapping any occupied interval. A template whose
/// windows are all shorter than the session yields an empty list.
///
/// # Errors
/// Returns [`SlotError::InvalidRequest`] for a zero session length or a zero
/// result cap, and [`SlotError::InvalidAvailabilityMask`] for a bad mask. No
/// error can occur once the sweep has started.
pub fn generate_slots(request: &SlotRequest) -> Result<Vec<Slot>> {
    if request.session_minutes == 0 {
        return Err(SlotError::InvalidRequest(
            "session duration must be at least one minute".to_string(),
        ));
    }
    if request.max_results == 0 {
        return Err(SlotError::InvalidRequest(
            "max_results must be at least 1".to_string(),
        ));
    }
    let week = decode_weekly_mask(request.weekly_mask)?;

    let windows = bookable_windows(&request.windows, request.session_minutes);
    if windows.is_empty() {
        debug!(
            session_minutes = request.session_minutes,
            "no availability window can hold a session"
        );
        return Ok(Vec::new());
    }

    let occupied: Vec<Vec<TimeRange<DateTime<Utc>>>> =
        request.occupied.iter().map(OccupiedSource::merged).collect();

    let tz = request.timezone;
    let origin = anchor(
        request.start_date,
        windows[0].start_minute(),
        tz,
        DstPolicy::ShiftForward,
    )
    .ok_or_else(|| {
        SlotError::InvalidRequest(format!("cannot anchor {} in {}", request.start_date, tz))
    })?;
    let horizon_end = request
        .horizon
        .end_from(origin)
        .ok_or_else(|| SlotError::InvalidRequest(format!("horizon {} overflows", request.horizon)))?
        .with_timezone(&Utc);

    debug!(
        windows = windows.len(),
        sources = occupied.len(),
        %horizon_end,
        "starting slot sweep"
    );

    let Some(mut sweep) = Sweep::new(
        request.start_date,
        week,
        &windows,
        request.session_minutes,
        request.gap_minutes,
    ) else {
        return Ok(Vec::new());
    };

    let mut cursors: Vec<OccupiedCursor<'_>> =
        occupied.iter().map(|iv| OccupiedCursor::new(iv)).collect();
    let session = Duration::minutes(i64::from(request.session_minutes));
    let mut slots: Vec<Slot> = Vec::new();
    // End of the previous candidate; nothing may start before it.
    let mut floor: Option<DateTime<Utc>> = None;

    loop {
        if let Some(start) = anchor(sweep.date, sweep.start_minute, tz, request.dst_policy) {
            let start_utc = start.with_timezone(&Utc);
            if start_utc >= horizon_end {
                break;
            }
            let end_utc = start_utc + session;

            if floor.is_none_or(|f| start_utc >= f) {
                floor = Some(end_utc);

                let blocked = cursors
                    .iter_mut()
                    .zip(&request.occupied)
                    .find_map(|(cursor, source)| {
                        cursor
                            .blocking(start_utc, end_utc)
                            .map(|iv| (source.source_id.as_str(), iv))
                    });

                match blocked {
                    Some((source_id, interval)) => {
                        trace!(
                            %start_utc,
                            source_id,
                            busy_start = %interval.start(),
                            busy_end = %interval.end(),
                            "candidate rejected"
                        );
                    }
                    None => {
                        slots.push(Slot {
                            start,
                            end: end_utc.with_timezone(&tz),
                        });
                        if slots.len() >= request.max_results {
                            break;
                        }
                    }
                }
            }
        }

        if sweep.advance().is_none() {
            break;
        }
    }

    debug!(offered = slots.len(), "slot sweep finished");
    Ok(slots)
}

/// Position of the current candidate within the recurring template.
struct Sweep<'w> {
    week: WeekAvailability,
    windows: &'w [AvailabilityWindow],
    session_minutes: u32,
    step_minutes: u32,
    date: NaiveDate,
    window_index: usize,
    start_minute: u32,
}

impl<'w> Sweep<'w> {
    /// `windows` must be non-empty, merged, and each long enough for a session.
    fn new(
        start_date: NaiveDate,
        week: WeekAvailability,
        windows: &'w [AvailabilityWindow],
        session_minutes: u32,
        gap_minutes: u32,
    ) -> Option<Self> {
        let mut sweep = Self {
            week,
            windows,
            session_minutes,
            step_minutes: session_minutes.saturating_add(gap_minutes),
            date: start_date,
            window_index: 0,
            start_minute: windows.first()?.start_minute(),
        };
        sweep.skip_unavailable_days()?;
        Some(sweep)
    }

    /// Move forward until the current date falls on an available weekday.
    /// Terminates within a week because a valid mask marks at least one day.
    fn skip_unavailable_days(&mut self) -> Option<()> {
        while !self.week.is_available(self.date.weekday()) {
            self.date = self.date.succ_opt()?;
        }
        Some(())
    }

    /// Step to the next candidate: later in the same window if the session still
    /// fits, else the next window, else the first window of the next available day.
    /// Returns `None` only when the calendar runs out.
    fn advance(&mut self) -> Option<()> {
        let next = self.start_minute.saturating_add(self.step_minutes);
        if self.windows[self.window_index].fits(next, self.session_minutes) {
            self.start_minute = next;
            return Some(());
        }

        self.window_index += 1;
        if self.window_index == self.windows.len() {
            self.window_index = 0;
            self.date = self.date.succ_opt()?;
            self.skip_unavailable_days()?;
        }
        self.start_minute = self.windows[self.window_index].start_minute();
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weekly::WeeklyMask;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
    }

    #[test]
    fn sweep_rolls_into_second_window() {
        let windows = [
            AvailabilityWindow::new(480, 540).unwrap(),
            AvailabilityWindow::new(600, 660).unwrap(),
        ];
        let mut sweep = Sweep::new(monday(), WeeklyMask::WEEKDAYS.decode(), &windows, 60, 0).unwrap();
        assert_eq!(sweep.start_minute, 480);
        sweep.advance().unwrap();
        assert_eq!((sweep.window_index, sweep.start_minute), (1, 600));
        sweep.advance().unwrap();
        assert_eq!(sweep.date, NaiveDate::from_ymd_opt(2026, 3, 17).unwrap());
        assert_eq!((sweep.window_index, sweep.start_minute), (0, 480));
    }

    #[test]
    fn sweep_wraps_friday_to_monday() {
        let windows = [AvailabilityWindow::new(480, 540).unwrap()];
        let friday = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let mut sweep = Sweep::new(friday, WeeklyMask::WEEKDAYS.decode(), &windows, 60, 0).unwrap();
        sweep.advance().unwrap();
        assert_eq!(sweep.date, NaiveDate::from_ymd_opt(2026, 3, 23).unwrap());
    }

    #[test]
    fn gap_counts_toward_fit() {
        let windows = [AvailabilityWindow::new(480, 600).unwrap()];
        let mut sweep = Sweep::new(monday(), WeeklyMask::WEEKDAYS.decode(), &windows, 45, 30).unwrap();
        // 480 + 45 + 30 = 555, and 555 + 45 = 600 still fits.
        sweep.advance().unwrap();
        assert_eq!(sweep.start_minute, 555);
        sweep.advance().unwrap();
        assert_eq!(sweep.date, NaiveDate::from_ymd_opt(2026, 3, 17).unwrap());
    }

    #[test]
    fn horizon_parses_short_and_long_units() {
        assert_eq!("14d".parse::<Horizon>().unwrap(), Horizon::Days(14));
        assert_eq!("3 months".parse::<Horizon>().unwrap(), Horizon::Months(3));
        assert_eq!(Horizon::Days(30).to_string(), "30d");
        assert!("3 weeks".parse::<Horizon>().is_err());
        assert!("days".parse::<Horizon>().is_err());
    }

    #[test]
    fn horizon_days_and_months() {
        let origin = anchor(monday(), 480, Tz::UTC, DstPolicy::ShiftForward).unwrap();
        let days = Horizon::Days(7).end_from(origin).unwrap();
        assert_eq!(days.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 23).unwrap());
        let months = Horizon::Months(3).end_from(origin).unwrap();
        assert_eq!(months.date_naive(), NaiveDate::from_ymd_opt(2026, 6, 16).unwrap());
    }

    #[test]
    fn horizon_keeps_wall_clock_across_dst() {
        let ny: Tz = "America/New_York".parse().unwrap();
        let winter = NaiveDate::from_ymd_opt(2026, 2, 16).unwrap();
        let origin = anchor(winter, 540, ny, DstPolicy::ShiftForward).unwrap();

        let end = Horizon::Months(1).end_from(origin).unwrap();
        assert_eq!(end.to_rfc3339(), "2026-03-16T09:00:00-04:00");
        let end = Horizon::Days(28).end_from(origin).unwrap();
        assert_eq!(end.to_rfc3339(), "2026-03-16T09:00:00-04:00");
    }

    #[test]
    fn horizon_ending_on_a_transition_resolves() {
        let ny: Tz = "America/New_York".parse().unwrap();

        // 2026-11-01 01:30 happens twice; the earlier instant is used.
        let summer = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let origin = anchor(summer, 90, ny, DstPolicy::ShiftForward).unwrap();
        let end = Horizon::Months(3).end_from(origin).unwrap();
        assert_eq!(end.to_rfc3339(), "2026-11-01T01:30:00-04:00");

        // 2026-03-08 02:30 does not exist; it moves past the gap.
        let december = NaiveDate::from_ymd_opt(2025, 12, 8).unwrap();
        let origin = anchor(december, 150, ny, DstPolicy::ShiftForward).unwrap();
        let end = Horizon::Months(3).end_from(origin).unwrap();
        assert_eq!(end.to_rfc3339(), "2026-03-08T03:30:00-04:00");
    }
}
