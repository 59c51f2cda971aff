//! The warn-then-confirm booking protocol.
//!
//! [`BookingFlow`] is a small state machine driven by [`BookingFlow::apply`]:
//!
//! ```text
//! Idle ──select(clean)────────────────────────────▶ Committed
//! Idle ──select(advisory)──▶ PendingConfirmation ──confirm_anyway──▶ Committed
//!                            PendingConfirmation ──choose_another──▶ Idle
//! Idle ──select(blocked)──▶ error, stays Idle
//! ```
//!
//! Every other (state, event) pair is rejected with
//! [`SchedulingError::InvalidTransition`] and leaves the state untouched.
//! A committed attempt is handed to the store with [`commit`].

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::appointment::{Appointment, AppointmentId};
use crate::error::{Result, SchedulingError};
use crate::evaluator::{Evaluation, SlotWarning};
use crate::generator::CandidateSlot;
use crate::store::{AppointmentPatch, AppointmentStore, NewAppointment};

/// A chosen start time together with its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAttempt {
    pub date: NaiveDate,
    #[serde(with = "crate::timefmt")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub evaluation: Evaluation,
    /// Set when rescheduling an existing appointment; commit then updates it.
    pub editing: Option<AppointmentId>,
}

impl BookingAttempt {
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            date,
            start_time,
            duration_minutes,
            evaluation,
            editing: None,
        }
    }

    /// An attempt for a slot picked from a generated grid.
    pub fn from_slot(date: NaiveDate, duration_minutes: u32, slot: &CandidateSlot) -> Self {
        Self::new(date, slot.start_time, duration_minutes, slot.evaluation())
    }

    pub fn editing(mut self, id: AppointmentId) -> Self {
        self.editing = Some(id);
        self
    }
}

/// User decisions fed into the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Select(BookingAttempt),
    ConfirmAnyway,
    ChooseAnother,
}

impl FlowEvent {
    fn name(&self) -> &'static str {
        match self {
            FlowEvent::Select(_) => "select",
            FlowEvent::ConfirmAnyway => "confirm anyway",
            FlowEvent::ChooseAnother => "choose another",
        }
    }
}

/// What a successful transition produced, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The attempt is ready to hand to the store.
    Committed { start_time: NaiveTime },
    /// Show `warning` for `start_time` and wait for a decision.
    NeedsConfirmation {
        start_time: NaiveTime,
        warning: SlotWarning,
    },
    /// The pending attempt was discarded; pick another slot.
    Cancelled { start_time: NaiveTime },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingFlow {
    #[default]
    Idle,
    PendingConfirmation(BookingAttempt),
    Committed(BookingAttempt),
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            BookingFlow::Idle => "idle",
            BookingFlow::PendingConfirmation(_) => "pending confirmation",
            BookingFlow::Committed(_) => "committed",
        }
    }

    pub fn pending(&self) -> Option<&BookingAttempt> {
        match self {
            BookingFlow::PendingConfirmation(attempt) => Some(attempt),
            _ => None,
        }
    }

    pub fn committed(&self) -> Option<&BookingAttempt> {
        match self {
            BookingFlow::Committed(attempt) => Some(attempt),
            _ => None,
        }
    }

    /// Apply one user decision.
    ///
    /// # Errors
    /// - `SchedulingError::SlotUnavailable` when selecting a blocked slot.
    /// - `SchedulingError::InvalidTransition` when `event` is not valid in the
    ///   current state (for example confirming with nothing pending).
    ///
    /// On error the state is unchanged.
    pub fn apply(&mut self, event: FlowEvent) -> Result<FlowOutcome> {
        let state = std::mem::take(self);

        match (state, event) {
            (BookingFlow::Idle, FlowEvent::Select(attempt)) => {
                let start_time = attempt.start_time;
                if !attempt.evaluation.available {
                    debug!(start = %start_time, "rejected selection of blocked slot");
                    return Err(SchedulingError::SlotUnavailable { start_time });
                }
                match attempt.evaluation.warning {
                    None => {
                        *self = BookingFlow::Committed(attempt);
                        Ok(FlowOutcome::Committed { start_time })
                    }
                    Some(warning) => {
                        debug!(start = %start_time, %warning, "selection needs confirmation");
                        *self = BookingFlow::PendingConfirmation(attempt);
                        Ok(FlowOutcome::NeedsConfirmation {
                            start_time,
                            warning,
                        })
                    }
                }
            }
            (BookingFlow::PendingConfirmation(attempt), FlowEvent::ConfirmAnyway) => {
                let start_time = attempt.start_time;
                *self = BookingFlow::Committed(attempt);
                Ok(FlowOutcome::Committed { start_time })
            }
            (BookingFlow::PendingConfirmation(attempt), FlowEvent::ChooseAnother) => {
                Ok(FlowOutcome::Cancelled {
                    start_time: attempt.start_time,
                })
            }
            (state, event) => {
                let err = SchedulingError::InvalidTransition {
                    state: state.state_name(),
                    event: event.name(),
                };
                *self = state;
                Err(err)
            }
        }
    }

    pub fn select(&mut self, attempt: BookingAttempt) -> Result<FlowOutcome> {
        self.apply(FlowEvent::Select(attempt))
    }

    pub fn confirm_anyway(&mut self) -> Result<FlowOutcome> {
        self.apply(FlowEvent::ConfirmAnyway)
    }

    pub fn choose_another(&mut self) -> Result<FlowOutcome> {
        self.apply(FlowEvent::ChooseAnother)
    }

    /// Drop whatever is in progress and start over.
    pub fn reset(&mut self) {
        *self = BookingFlow::Idle;
    }
}

/// Hand a committed attempt to the store.
///
/// New bookings are created; attempts with `editing` set update that
/// appointment. The result is not re-validated against the grid, and a store
/// failure does not roll back the flow: the caller re-presents the form.
///
/// # Errors
/// Returns `SchedulingError::Store` with the store's error.
pub fn commit<S: AppointmentStore + ?Sized>(
    store: &mut S,
    attempt: &BookingAttempt,
) -> Result<Appointment> {
    let result = match &attempt.editing {
        None => store.create(NewAppointment {
            date: attempt.date,
            start_time: attempt.start_time,
            duration_minutes: attempt.duration_minutes,
        }),
        Some(id) => store.update(
            id,
            AppointmentPatch {
                date: Some(attempt.date),
                start_time: Some(attempt.start_time),
                duration_minutes: Some(attempt.duration_minutes),
                status: None,
            },
        ),
    };

    match result {
        Ok(appointment) => {
            info!(
                id = %appointment.id,
                date = %appointment.date,
                start = %appointment.start_time,
                duration_minutes = appointment.duration_minutes,
                updated = attempt.editing.is_some(),
                "booking committed"
            );
            Ok(appointment)
        }
        Err(e) => {
            warn!(error = %e, date = %attempt.date, start = %attempt.start_time, "booking commit failed");
            Err(e.into())
        }
    }
}
