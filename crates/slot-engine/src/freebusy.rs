//! Compute the free windows of a business day.
//!
//! Active appointments on the date are clipped to business hours, sorted by
//! start, and merged into busy periods; the free windows are the gaps between
//! merged periods within business hours.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::appointment::{self, Appointment, AppointmentId};
use crate::preferences::SchedulingPreferences;

/// An uninterrupted free stretch within business hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeWindow {
    #[serde(with = "crate::timefmt")]
    pub start: NaiveTime,
    #[serde(with = "crate::timefmt")]
    pub end: NaiveTime,
    pub duration_minutes: i64,
}

impl FreeWindow {
    fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: start.time(),
            end: end.time(),
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Merge overlapping or adjacent busy periods, clipped to business hours.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
fn merge_busy_periods(
    date: NaiveDate,
    appointments: &[Appointment],
    editing: Option<&AppointmentId>,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> =
        appointment::blocking(appointments, date, editing)
            .map(Appointment::interval)
            .filter(|i| i.start < window_end && i.end > window_start)
            .map(|i| (i.start.max(window_start), i.end.min(window_end)))
            .collect();

    intervals.sort_by_key(|&(start, end)| (start, end));

    // Sorted by start, so each interval either extends the last merged one or
    // opens a new one.
    let mut merged: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or touching: extend the current busy block.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free windows within business hours on `date`, sorted by start time.
///
/// Cancelled appointments, appointments on other dates, and the appointment
/// being edited (if any) do not occupy time.
pub fn find_free_windows(
    date: NaiveDate,
    appointments: &[Appointment],
    editing: Option<&AppointmentId>,
    preferences: &SchedulingPreferences,
) -> Vec<FreeWindow> {
    let window_start = date.and_time(preferences.business_start);
    let window_end = date.and_time(preferences.business_end);
    if window_start >= window_end {
        return Vec::new();
    }

    let merged = merge_busy_periods(date, appointments, editing, window_start, window_end);

    let mut free = Vec::new();
    let mut cursor = window_start;

    // Walk the busy blocks; whatever lies between the cursor and the next
    // block is free.
    for (busy_start, busy_end) in &merged {
        if cursor < *busy_start {
            free.push(FreeWindow::new(cursor, *busy_start));
        }
        cursor = cursor.max(*busy_end);
    }

    // Free time after the last appointment until closing.
    if cursor < window_end {
        free.push(FreeWindow::new(cursor, window_end));
    }

    free
}

/// The first free window of at least `min_duration_minutes`.
pub fn find_first_free_window(
    date: NaiveDate,
    appointments: &[Appointment],
    editing: Option<&AppointmentId>,
    preferences: &SchedulingPreferences,
    min_duration_minutes: u32,
) -> Option<FreeWindow> {
    find_free_windows(date, appointments, editing, preferences)
        .into_iter()
        .find(|w| w.duration_minutes >= i64::from(min_duration_minutes))
}
