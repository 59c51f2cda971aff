//! Build the day's grid of candidate start times.
//!
//! Starting at `business_start`, the grid steps forward by the slot granularity
//! while the step start is strictly before `business_end`, evaluating each step.
//! A slot is never generated at or after closing time, even if the booking would
//! fit. The grid is always regenerated from scratch: a change to any single input
//! can shift the status of every slot.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::appointment::{Appointment, AppointmentId};
use crate::evaluator::{self, Evaluation, SlotWarning};
use crate::preferences::SchedulingPreferences;

/// One pickable start time with its evaluation.
///
/// Serializes as `{"start_time": "HH:MM", "available": bool, "warning": text}`
/// with the warning rendered as its user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateSlot {
    #[serde(serialize_with = "crate::timefmt::serialize")]
    pub start_time: NaiveTime,
    pub available: bool,
    #[serde(serialize_with = "warning_message")]
    pub warning: Option<SlotWarning>,
}

fn warning_message<S: Serializer>(
    warning: &Option<SlotWarning>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match warning {
        Some(w) => serializer.collect_str(w),
        None => serializer.serialize_none(),
    }
}

impl CandidateSlot {
    pub fn new(start_time: NaiveTime, evaluation: Evaluation) -> Self {
        Self {
            start_time,
            available: evaluation.available,
            warning: evaluation.warning,
        }
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            available: self.available,
            warning: self.warning,
        }
    }
}

/// Generate the ordered slot grid for a booking of `duration_minutes` on `date`.
///
/// Arguments have the same meaning as in [`evaluator::evaluate`].
///
/// # Panics
/// Panics if `duration_minutes` is zero or `preferences` fail validation
/// (empty or inverted business hours, zero granularity).
pub fn generate(
    date: NaiveDate,
    duration_minutes: u32,
    appointments: &[Appointment],
    editing: Option<&AppointmentId>,
    now: NaiveDateTime,
    preferences: &SchedulingPreferences,
) -> Vec<CandidateSlot> {
    if let Err(e) = preferences.validate() {
        panic!("{}", e);
    }

    let slots: Vec<CandidateSlot> = slot_starts(preferences)
        .map(|start_time| {
            let evaluation = evaluator::evaluate(
                date,
                start_time,
                duration_minutes,
                appointments,
                editing,
                now,
                preferences,
            );
            CandidateSlot::new(start_time, evaluation)
        })
        .collect();

    let summary = GridSummary::from_slots(&slots);
    debug!(
        %date,
        duration_minutes,
        total = summary.total,
        clean = summary.clean,
        advisory = summary.advisory,
        blocked = summary.blocked,
        "generated slot grid"
    );

    slots
}

/// Start times from `business_start` (inclusive) to `business_end` (exclusive).
fn slot_starts(preferences: &SchedulingPreferences) -> impl Iterator<Item = NaiveTime> {
    let step = Duration::minutes(i64::from(preferences.slot_granularity_minutes));
    let end = preferences.business_end;

    std::iter::successors(Some(preferences.business_start), move |current| {
        // NaiveTime addition wraps at midnight; stop instead.
        let (next, wrapped) = current.overflowing_add_signed(step);
        (wrapped == 0).then_some(next)
    })
    .take_while(move |t| *t < end)
}

/// Slots that can be booked, with or without a warning.
pub fn available_slots(slots: &[CandidateSlot]) -> impl Iterator<Item = &CandidateSlot> {
    slots.iter().filter(|s| s.available)
}

/// The earliest slot that can be booked without confirmation.
pub fn first_clean_slot(slots: &[CandidateSlot]) -> Option<&CandidateSlot> {
    slots.iter().find(|s| s.available && s.warning.is_none())
}

/// Counts of each classification in a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub total: usize,
    pub clean: usize,
    pub advisory: usize,
    pub blocked: usize,
}

impl GridSummary {
    pub fn from_slots(slots: &[CandidateSlot]) -> Self {
        slots.iter().fold(Self::default(), |mut acc, slot| {
            acc.total += 1;
            match (slot.available, slot.warning.is_some()) {
                (false, _) => acc.blocked += 1,
                (true, false) => acc.clean += 1,
                (true, true) => acc.advisory += 1,
            }
            acc
        })
    }
}
