//! JSON request/response shapes for the engine's adapters.
//!
//! The CLI and the WASM bindings both speak these shapes, so the boundary
//! parsing lives here once. Datetimes travel as strings: RFC 3339 with an offset
//! (e.g., "2026-03-16T08:00:00-04:00"), or naive `YYYY-MM-DDTHH:MM:SS`, which
//! is read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::interval::{merge_intervals, TimeRange};
use crate::occupied::{Hold, OccupiedSource, DEFAULT_HOLD_MINUTES, HOLD_SOURCE_ID};
use crate::scheduler::{Horizon, RequestDefaults, Slot, SlotRequest};
use crate::template::parse_timezone;
use crate::weekly::{decode_weekly_mask, WeeklyMask};
use crate::window::AvailabilityWindow;

/// Input format for a slot query.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotRequestDto {
    pub start_date: NaiveDate,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub max_results: Option<usize>,
    pub horizon: Option<Horizon>,
    pub session_minutes: u32,
    #[serde(default)]
    pub gap_minutes: u32,
    #[serde(default = "default_windows")]
    pub windows: Vec<WindowDto>,
    #[serde(default = "default_weekly_mask")]
    pub weekly_mask: u32,
    #[serde(default)]
    pub occupied: Vec<SourceDto>,
    /// Temporary holds; expired ones are dropped against `now`.
    #[serde(default)]
    pub holds: Vec<HoldDto>,
    #[serde(default)]
    pub dst_policy: DstPolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowDto {
    pub start_minute: u32,
    pub end_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDto {
    pub source_id: String,
    pub intervals: Vec<RangeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeDto {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldDto {
    pub start: String,
    pub end: String,
    pub created_at: String,
    #[serde(default = "default_hold_minutes")]
    pub expiration_minutes: u32,
}

/// One offered slot on the wire, in the host's offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDto {
    pub start: String,
    pub end: String,
}

impl From<&Slot> for SlotDto {
    fn from(s: &Slot) -> Self {
        Self {
            start: s.start.to_rfc3339(),
            end: s.end.to_rfc3339(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_windows() -> Vec<WindowDto> {
    let w = AvailabilityWindow::BUSINESS_HOURS;
    vec![WindowDto {
        start_minute: w.start_minute(),
        end_minute: w.end_minute(),
    }]
}

fn default_weekly_mask() -> u32 {
    WeeklyMask::WEEKDAYS.bits()
}

fn default_hold_minutes() -> u32 {
    DEFAULT_HOLD_MINUTES
}

impl SlotRequestDto {
    /// Validate and convert into an engine request.
    ///
    /// Missing `max_results`/`horizon` come from `defaults`; holds that have
    /// expired at `now` are discarded.
    pub fn into_request(self, defaults: &RequestDefaults, now: DateTime<Utc>) -> Result<SlotRequest> {
        let timezone = parse_timezone(&self.timezone)?;

        let windows = self
            .windows
            .iter()
            .map(|w| AvailabilityWindow::new(w.start_minute, w.end_minute))
            .collect::<Result<Vec<_>>>()?;

        let mut occupied = self
            .occupied
            .iter()
            .map(|src| {
                let intervals = src
                    .intervals
                    .iter()
                    .map(parse_range)
                    .collect::<Result<Vec<_>>>()?;
                Ok(OccupiedSource::new(src.source_id.clone(), intervals))
            })
            .collect::<Result<Vec<_>>>()?;

        if !self.holds.is_empty() {
            let holds = self
                .holds
                .iter()
                .map(|h| {
                    Hold::new(
                        parse_datetime(&h.start)?,
                        parse_datetime(&h.end)?,
                        parse_datetime(&h.created_at)?,
                        h.expiration_minutes,
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            occupied.push(OccupiedSource::from_holds(HOLD_SOURCE_ID, &holds, now));
        }

        Ok(SlotRequest {
            max_results: self.max_results.unwrap_or(defaults.max_results),
            start_date: self.start_date,
            horizon: self.horizon.unwrap_or(defaults.horizon),
            timezone,
            session_minutes: self.session_minutes,
            gap_minutes: self.gap_minutes,
            windows,
            weekly_mask: self.weekly_mask,
            occupied,
            dst_policy: self.dst_policy,
        })
    }
}

/// Parse a JSON slot query.
pub fn parse_request(json: &str, defaults: &RequestDefaults, now: DateTime<Utc>) -> Result<SlotRequest> {
    let dto: SlotRequestDto = serde_json::from_str(json)?;
    dto.into_request(defaults, now)
}

/// Serialize slots as a JSON array of `{start, end}` objects.
pub fn slots_to_json(slots: &[Slot], pretty: bool) -> Result<String> {
    let dtos: Vec<SlotDto> = slots.iter().map(SlotDto::from).collect();
    let json = if pretty {
        serde_json::to_string_pretty(&dtos)?
    } else {
        serde_json::to_string(&dtos)?
    };
    Ok(json)
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with offset) and naive local time, which is read as UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    // Try RFC 3339 first (has timezone info).
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

fn parse_range(r: &RangeDto) -> Result<TimeRange<DateTime<Utc>>> {
    TimeRange::new(parse_datetime(&r.start)?, parse_datetime(&r.end)?)
}

/// A `{start, end}` pair of either integers (e.g., minute offsets) or datetimes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RangeInput {
    Numeric { start: i64, end: i64 },
    Datetime { start: String, end: String },
}

/// Merge a JSON array of `{start, end}` ranges and return the merged array.
///
/// All entries must share one kind: integers or datetime strings. Datetime
/// output is normalized to UTC.
pub fn merge_ranges_json(json: &str) -> Result<String> {
    let inputs: Vec<RangeInput> = serde_json::from_str(json)?;

    let all_numeric = inputs.iter().all(|r| matches!(r, RangeInput::Numeric { .. }));
    let all_datetime = inputs.iter().all(|r| matches!(r, RangeInput::Datetime { .. }));

    if all_numeric {
        let ranges = inputs
            .iter()
            .filter_map(|r| match r {
                RangeInput::Numeric { start, end } => Some(TimeRange::new(*start, *end)),
                RangeInput::Datetime { .. } => None,
            })
            .collect::<Result<Vec<_>>>()?;
        let merged: Vec<Value> = merge_intervals(&ranges)
            .iter()
            .map(|r| serde_json::json!({ "start": r.start(), "end": r.end() }))
            .collect();
        return Ok(serde_json::to_string(&merged)?);
    }

    if all_datetime {
        let ranges = inputs
            .iter()
            .filter_map(|r| match r {
                RangeInput::Datetime { start, end } => Some(parse_range(&RangeDto {
                    start: start.clone(),
                    end: end.clone(),
                })),
                RangeInput::Numeric { .. } => None,
            })
            .collect::<Result<Vec<_>>>()?;
        let merged: Vec<RangeDto> = merge_intervals(&ranges)
            .iter()
            .map(|r| RangeDto {
                start: r.start().to_rfc3339(),
                end: r.end().to_rfc3339(),
            })
            .collect();
        return Ok(serde_json::to_string(&merged)?);
    }

    Err(SlotError::InvalidRequest(
        "ranges must be all integers or all datetimes".to_string(),
    ))
}

/// Decode a weekly mask into a JSON object of weekday → availability, Monday first.
pub fn week_availability_json(mask: u32) -> Result<String> {
    let week = decode_weekly_mask(mask)?;
    let mut map = Map::new();
    for (day, available) in week.entries() {
        map.insert(day.to_string(), Value::Bool(available));
    }
    Ok(serde_json::to_string(&Value::Object(map))?)
}
