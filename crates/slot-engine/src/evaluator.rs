//! Classify a single candidate booking against a day's existing appointments.
//!
//! A candidate is one of:
//!
//! - **blocked**: it overlaps an active appointment (`available == false`);
//! - **advisory**: free, but either in the past or closer to a neighbor than
//!   the preferred minimum gap (`available == true` with a warning);
//! - **clean**: free with no warning.
//!
//! Overlap always wins: a blocked candidate never carries a warning and no gap
//! is computed for it. When a candidate is both in the past and too close to a
//! neighbor, only the past-time warning is reported.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::appointment::{self, Appointment, AppointmentId};
use crate::error::{Result, SchedulingError};
use crate::interval::TimeInterval;
use crate::preferences::SchedulingPreferences;

/// Advisory (non-blocking) conditions that need explicit acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotWarning {
    /// The candidate starts before "now".
    PastTime,
    /// The nearest neighbor is closer than the preferred minimum gap.
    InsufficientGap {
        actual_minutes: i64,
        recommended_minutes: u32,
    },
}

impl fmt::Display for SlotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotWarning::PastTime => f.write_str("Selected time is in the past"),
            SlotWarning::InsufficientGap {
                actual_minutes,
                recommended_minutes,
            } => write!(
                f,
                "Too close to another appointment: {} min gap, {} recommended",
                actual_minutes, recommended_minutes
            ),
        }
    }
}

/// Result of evaluating one candidate start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub available: bool,
    pub warning: Option<SlotWarning>,
}

impl Evaluation {
    pub const BLOCKED: Evaluation = Evaluation {
        available: false,
        warning: None,
    };

    pub const CLEAN: Evaluation = Evaluation {
        available: true,
        warning: None,
    };

    pub fn advisory(warning: SlotWarning) -> Self {
        Self {
            available: true,
            warning: Some(warning),
        }
    }

    /// Available with nothing to acknowledge.
    pub fn is_clean(&self) -> bool {
        self.available && self.warning.is_none()
    }

    /// Available, but the user must confirm before booking.
    pub fn needs_confirmation(&self) -> bool {
        self.available && self.warning.is_some()
    }
}

/// Check caller-supplied inputs before handing them to the engine.
///
/// The engine functions assert the same conditions and panic on violation;
/// boundary code (CLI, bindings, forms) should call this first and report the
/// error instead.
///
/// # Errors
/// Returns `SchedulingError::InvalidDuration` for a zero duration and
/// `SchedulingError::InvalidPreferences` for unusable preferences.
pub fn validate_request(duration_minutes: u32, preferences: &SchedulingPreferences) -> Result<()> {
    if duration_minutes == 0 {
        return Err(SchedulingError::InvalidDuration(duration_minutes));
    }
    preferences.validate()
}

/// Evaluate a candidate booking of `duration_minutes` starting at `start_time`
/// on `date`.
///
/// # Arguments
/// - `appointments` -- the day's existing appointments (other dates and
///   cancelled entries are ignored)
/// - `editing` -- id of the appointment being rescheduled, if any; it is
///   excluded so an edit never conflicts with itself
/// - `now` -- current wall-clock instant, for the past-time check
/// - `preferences` -- supplies the minimum preferred gap
///
/// # Panics
/// Panics if `duration_minutes` is zero.
pub fn evaluate(
    date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: u32,
    appointments: &[Appointment],
    editing: Option<&AppointmentId>,
    now: NaiveDateTime,
    preferences: &SchedulingPreferences,
) -> Evaluation {
    assert!(duration_minutes > 0, "booking duration must be positive");

    let candidate = TimeInterval::new(date.and_time(start_time), duration_minutes);

    if let Some(conflict) =
        appointment::blocking(appointments, date, editing).find(|a| candidate.overlaps(&a.interval()))
    {
        trace!(
            %date,
            start = %start_time,
            duration_minutes,
            conflicts_with = %conflict.id,
            "slot blocked"
        );
        return Evaluation::BLOCKED;
    }

    let min_gap = appointment::blocking(appointments, date, editing)
        .filter_map(|a| candidate.gap_to(&a.interval()))
        .min();

    let evaluation = if candidate.start < now {
        Evaluation::advisory(SlotWarning::PastTime)
    } else {
        match min_gap {
            Some(gap) if gap < i64::from(preferences.minimum_gap_minutes) => {
                Evaluation::advisory(SlotWarning::InsufficientGap {
                    actual_minutes: gap,
                    recommended_minutes: preferences.minimum_gap_minutes,
                })
            }
            _ => Evaluation::CLEAN,
        }
    };

    trace!(
        %date,
        start = %start_time,
        duration_minutes,
        min_gap = ?min_gap,
        warning = evaluation.warning.is_some(),
        "slot available"
    );

    evaluation
}
