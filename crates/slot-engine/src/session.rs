//! A day-view booking form session.
//!
//! [`BookingSession`] ties the pieces together for one booking: it fetches a
//! fresh snapshot of the date's appointments from the store on every grid
//! computation and every selection, runs the evaluator/generator, and drives a
//! [`BookingFlow`]. Appointments are never cached between calls.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::appointment::{Appointment, AppointmentId};
use crate::confirmation::{self, BookingAttempt, BookingFlow, FlowOutcome};
use crate::error::{Result, SchedulingError};
use crate::evaluator::{self, Evaluation};
use crate::generator::{self, CandidateSlot};
use crate::preferences::SchedulingPreferences;
use crate::store::AppointmentStore;

#[derive(Debug, Clone)]
pub struct BookingSession {
    date: NaiveDate,
    duration_minutes: u32,
    editing: Option<AppointmentId>,
    preferences: SchedulingPreferences,
    flow: BookingFlow,
}

impl BookingSession {
    /// Start a session for a new booking.
    ///
    /// # Errors
    /// Returns `SchedulingError::InvalidDuration` or
    /// `SchedulingError::InvalidPreferences` for unusable inputs.
    pub fn new(
        date: NaiveDate,
        duration_minutes: u32,
        preferences: SchedulingPreferences,
    ) -> Result<Self> {
        evaluator::validate_request(duration_minutes, &preferences)?;
        Ok(Self {
            date,
            duration_minutes,
            editing: None,
            preferences,
            flow: BookingFlow::Idle,
        })
    }

    /// Start a session that reschedules `appointment`.
    ///
    /// The appointment's own date and duration are the initial inputs, and it is
    /// excluded from all conflict and gap checks.
    pub fn for_edit(appointment: &Appointment, preferences: SchedulingPreferences) -> Result<Self> {
        let mut session = Self::new(appointment.date, appointment.duration_minutes, preferences)?;
        session.editing = Some(appointment.id.clone());
        Ok(session)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn editing(&self) -> Option<&AppointmentId> {
        self.editing.as_ref()
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    /// Change the date. Any attempt in progress is discarded.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.flow.reset();
    }

    /// Change the duration. Any attempt in progress is discarded.
    ///
    /// # Errors
    /// Returns `SchedulingError::InvalidDuration` for zero.
    pub fn set_duration(&mut self, duration_minutes: u32) -> Result<()> {
        if duration_minutes == 0 {
            return Err(SchedulingError::InvalidDuration(duration_minutes));
        }
        self.duration_minutes = duration_minutes;
        self.flow.reset();
        Ok(())
    }

    fn snapshot<S: AppointmentStore + ?Sized>(&self, store: &S) -> Result<Vec<Appointment>> {
        Ok(store.appointments_on(self.date)?)
    }

    /// Regenerate the slot grid from a fresh snapshot of the store.
    pub fn slot_grid<S: AppointmentStore + ?Sized>(
        &self,
        store: &S,
        now: NaiveDateTime,
    ) -> Result<Vec<CandidateSlot>> {
        let appointments = self.snapshot(store)?;
        Ok(generator::generate(
            self.date,
            self.duration_minutes,
            &appointments,
            self.editing.as_ref(),
            now,
            &self.preferences,
        ))
    }

    /// Evaluate an arbitrary start time against a fresh snapshot.
    pub fn evaluate<S: AppointmentStore + ?Sized>(
        &self,
        store: &S,
        start_time: NaiveTime,
        now: NaiveDateTime,
    ) -> Result<Evaluation> {
        let appointments = self.snapshot(store)?;
        Ok(evaluator::evaluate(
            self.date,
            start_time,
            self.duration_minutes,
            &appointments,
            self.editing.as_ref(),
            now,
            &self.preferences,
        ))
    }

    /// Select a start time: re-validate it and feed it to the flow.
    ///
    /// The time need not be on the grid (manual entry is re-validated the same
    /// way).
    pub fn select<S: AppointmentStore + ?Sized>(
        &mut self,
        store: &S,
        start_time: NaiveTime,
        now: NaiveDateTime,
    ) -> Result<FlowOutcome> {
        let evaluation = self.evaluate(store, start_time, now)?;
        let mut attempt =
            BookingAttempt::new(self.date, start_time, self.duration_minutes, evaluation);
        attempt.editing = self.editing.clone();
        self.flow.select(attempt)
    }

    pub fn confirm_anyway(&mut self) -> Result<FlowOutcome> {
        self.flow.confirm_anyway()
    }

    pub fn choose_another(&mut self) -> Result<FlowOutcome> {
        self.flow.choose_another()
    }

    /// Commit the committed attempt to the store.
    ///
    /// On success the flow returns to `Idle`. On store failure the flow stays
    /// committed so the caller can retry or re-present the form.
    ///
    /// # Errors
    /// - `SchedulingError::InvalidTransition` if nothing has been committed.
    /// - `SchedulingError::Store` if the store rejects the booking.
    pub fn submit<S: AppointmentStore + ?Sized>(&mut self, store: &mut S) -> Result<Appointment> {
        let attempt = self
            .flow
            .committed()
            .ok_or(SchedulingError::InvalidTransition {
                state: self.flow.state_name(),
                event: "submit",
            })?;
        let appointment = confirmation::commit(store, attempt)?;
        self.flow.reset();
        Ok(appointment)
    }
}
