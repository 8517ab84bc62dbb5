//! WASM bindings for slot-engine.
//!
//! Exposes slot generation, interval merging, and weekly mask decoding to
//! JavaScript via `wasm-bindgen`. Requests and results cross the boundary as
//! JSON strings using the same wire format as the `slots` CLI.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::Utc;
use slot_engine::wire;
use slot_engine::RequestDefaults;
use wasm_bindgen::prelude::*;

fn to_js(e: slot_engine::SlotError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Generate bookable slots for a JSON slot request.
///
/// Returns a JSON array of `{start, end}` objects with RFC 3339 datetimes in
/// the request's timezone.
///
/// # Arguments
/// - `request_json` -- slot request (`start_date`, `session_minutes`, `windows`, ...)
/// - `now` -- Optional instant used to expire holds; defaults to the current time
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(request_json: &str, now: Option<String>) -> Result<String, JsValue> {
    let now = match now {
        Some(raw) => wire::parse_datetime(&raw).map_err(to_js)?,
        None => Utc::now(),
    };

    let request =
        wire::parse_request(request_json, &RequestDefaults::default(), now).map_err(to_js)?;
    let slots = slot_engine::generate_slots(&request).map_err(to_js)?;

    wire::slots_to_json(&slots, false).map_err(to_js)
}

/// Merge a JSON array of `{start, end}` ranges.
///
/// Ranges are either all integers (minutes) or all ISO 8601 datetimes.
/// Overlapping and touching ranges are combined; the result is sorted.
#[wasm_bindgen(js_name = "mergeIntervals")]
pub fn merge_intervals(ranges_json: &str) -> Result<String, JsValue> {
    wire::merge_ranges_json(ranges_json).map_err(to_js)
}

/// Decode a weekly mask into a JSON object of `{"Mon": true, ...}`.
#[wasm_bindgen(js_name = "decodeWeeklyMask")]
pub fn decode_weekly_mask(mask: u32) -> Result<String, JsValue> {
    wire::week_availability_json(mask).map_err(to_js)
}

#[wasm_bindgen(js_name = "isValidWeeklyMask")]
pub fn is_valid_weekly_mask(mask: u32) -> bool {
    slot_engine::is_valid_weekly_mask(mask)
}
