//! # slot-engine
//!
//! Bookable slot generation for calendar booking.
//!
//! Given a host's recurring weekly template (daily windows plus working
//! weekdays), a session length, and several independent lists of occupied time
//! (synced calendar, confirmed bookings, holds), the engine sweeps forward from
//! a start date and returns the ordered, non-overlapping slots a guest may book.
//! It never performs I/O: callers load the inputs and ship the result.
//!
//! ## Modules
//!
//! - [`interval`] — `TimeRange` and interval merging
//! - [`weekly`] — 7-bit weekday mask encoding and decoding
//! - [`window`] — daily availability windows in minutes after midnight
//! - [`dst`] — anchoring wall-clock minutes to instants across DST transitions
//! - [`occupied`] — occupied-time sources and expiring holds
//! - [`conflict`] — forward-only conflict cursor
//! - [`scheduler`] — the slot sweep
//! - [`template`] — stored schedule templates
//! - [`wire`] — JSON request/response shapes used by the adapters
//! - [`error`] — Error types

pub mod conflict;
pub mod dst;
pub mod error;
pub mod interval;
pub mod occupied;
pub mod scheduler;
pub mod template;
pub mod weekly;
pub mod window;
pub mod wire;

pub use dst::DstPolicy;
pub use error::SlotError;
pub use interval::{merge_intervals, merge_pairs, TimeRange};
pub use occupied::{Hold, OccupiedSource};
pub use scheduler::{generate_slots, Horizon, RequestDefaults, Slot, SlotRequest};
pub use template::ScheduleTemplate;
pub use weekly::{decode_weekly_mask, is_valid_weekly_mask, WeekAvailability, WeeklyMask};
pub use window::{merge_windows, AvailabilityWindow};
