//! WASM bindings for slot-engine.
//!
//! Exposes slot grid generation, single-slot evaluation and free-window
//! computation to JavaScript via `wasm-bindgen`. Requests and responses are JSON
//! strings. Each export is a thin wrapper over a `*_json` function returning
//! `Result<String, String>`, so the request handling can be exercised natively.
//!
//! ## Request shape
//!
//! ```json
//! {
//!   "date": "2026-03-16",
//!   "duration_minutes": 30,
//!   "start_time": "09:00",
//!   "now": "2026-03-16T07:00:00",
//!   "editing": "apt-3",
//!   "appointments": [
//!     { "id": "apt-3", "date": "2026-03-16", "start_time": "10:00", "duration_minutes": 60, "status": "scheduled" }
//!   ],
//!   "preferences": { "business_start": "08:00", "business_end": "18:00", "minimum_gap_minutes": 15 }
//! }
//! ```
//!
//! `start_time` is only read by `evaluateSlot` and `editing` is optional.
//! `preferences` must name both business hours.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use slot_engine::timefmt::parse_time;
use slot_engine::{Appointment, AppointmentId, Evaluation, FreeWindow, SchedulingPreferences};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input for every export.
#[derive(Deserialize)]
struct DayRequest {
    date: NaiveDate,
    #[serde(default)]
    duration_minutes: u32,
    #[serde(default)]
    start_time: Option<String>,
    now: String,
    #[serde(default)]
    editing: Option<AppointmentId>,
    #[serde(default)]
    appointments: Vec<Appointment>,
    preferences: SchedulingPreferences,
}

#[derive(Serialize)]
struct SlotDto {
    start_time: String,
    available: bool,
    /// `"past_time"` or `"insufficient_gap"`, for styling.
    warning_kind: Option<&'static str>,
    /// User-facing warning text for the confirmation dialog.
    warning: Option<String>,
}

impl SlotDto {
    fn new(start_time: chrono::NaiveTime, evaluation: &Evaluation) -> Self {
        Self {
            start_time: start_time.format("%H:%M").to_string(),
            available: evaluation.available,
            warning_kind: evaluation.warning.map(|w| match w {
                slot_engine::SlotWarning::PastTime => "past_time",
                slot_engine::SlotWarning::InsufficientGap { .. } => "insufficient_gap",
            }),
            warning: evaluation.warning.map(|w| w.to_string()),
        }
    }
}

#[derive(Serialize)]
struct FreeWindowDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

impl From<&FreeWindow> for FreeWindowDto {
    fn from(w: &FreeWindow) -> Self {
        Self {
            start: w.start.format("%H:%M").to_string(),
            end: w.end.format("%H:%M").to_string(),
            duration_minutes: w.duration_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a wall-clock instant.
///
/// Accepts naive local time (`"2026-03-16T14:00:00"` or `"2026-03-16T14:00"`)
/// and RFC 3339 with an offset, whose local wall-clock part is used as-is.
fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_request(json: &str) -> Result<(DayRequest, NaiveDateTime), String> {
    let request: DayRequest =
        serde_json::from_str(json).map_err(|e| format!("Invalid request JSON: {}", e))?;
    request.preferences.validate().map_err(|e| e.to_string())?;
    let now = parse_now(&request.now)?;
    Ok((request, now))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Request handlers
// ---------------------------------------------------------------------------

/// Generate the slot grid. Returns a JSON array of slot objects.
pub fn generate_slots_json(request_json: &str) -> Result<String, String> {
    let (req, now) = parse_request(request_json)?;
    slot_engine::validate_request(req.duration_minutes, &req.preferences)
        .map_err(|e| e.to_string())?;

    let slots = slot_engine::generate(
        req.date,
        req.duration_minutes,
        &req.appointments,
        req.editing.as_ref(),
        now,
        &req.preferences,
    );

    let dtos: Vec<SlotDto> = slots
        .iter()
        .map(|s| SlotDto::new(s.start_time, &s.evaluation()))
        .collect();
    to_json(&dtos)
}

/// Evaluate `start_time`. Returns a single slot object.
pub fn evaluate_slot_json(request_json: &str) -> Result<String, String> {
    let (req, now) = parse_request(request_json)?;
    slot_engine::validate_request(req.duration_minutes, &req.preferences)
        .map_err(|e| e.to_string())?;
    let raw_start = req
        .start_time
        .as_deref()
        .ok_or_else(|| "Missing start_time".to_string())?;
    let start_time =
        parse_time(raw_start).ok_or_else(|| format!("Invalid start_time '{}'", raw_start))?;

    let evaluation = slot_engine::evaluate(
        req.date,
        start_time,
        req.duration_minutes,
        &req.appointments,
        req.editing.as_ref(),
        now,
        &req.preferences,
    );

    to_json(&SlotDto::new(start_time, &evaluation))
}

/// Free windows within business hours. Returns a JSON array of
/// `{start, end, duration_minutes}` objects.
pub fn find_free_windows_json(request_json: &str) -> Result<String, String> {
    let (req, _) = parse_request(request_json)?;

    let windows = slot_engine::find_free_windows(
        req.date,
        &req.appointments,
        req.editing.as_ref(),
        &req.preferences,
    );

    let dtos: Vec<FreeWindowDto> = windows.iter().map(FreeWindowDto::from).collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(request_json: &str) -> Result<String, JsValue> {
    generate_slots_json(request_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = "evaluateSlot")]
pub fn evaluate_slot(request_json: &str) -> Result<String, JsValue> {
    evaluate_slot_json(request_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = "findFreeWindows")]
pub fn find_free_windows(request_json: &str) -> Result<String, JsValue> {
    find_free_windows_json(request_json).map_err(|e| JsValue::from_str(&e))
}
