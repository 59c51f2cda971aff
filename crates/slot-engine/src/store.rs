//! The appointment store collaborator.
//!
//! The engine reads a day's appointments through [`AppointmentStore`] and hands
//! committed bookings back to it. Persistence, transport and retries belong to
//! the implementation. [`InMemoryAppointmentStore`] is a single-writer,
//! `Vec`-backed implementation for tests, the CLI and embedding callers.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, AppointmentId, AppointmentStatus};
use crate::error::StoreError;

/// Payload for creating a new appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub date: NaiveDate,
    #[serde(with = "crate::timefmt")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
}

/// Partial update for an existing appointment. `None` fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(
        default,
        with = "crate::timefmt::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(start_time) = self.start_time {
            appointment.start_time = start_time;
        }
        if let Some(duration) = self.duration_minutes {
            appointment.duration_minutes = duration;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
    }
}

/// Source of existing appointments and sink for committed bookings.
pub trait AppointmentStore {
    /// All appointments on `date`, in any status.
    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError>;

    /// Persist a new appointment and return it with its assigned id.
    fn create(&mut self, appointment: NewAppointment) -> Result<Appointment, StoreError>;

    /// Apply `patch` to the appointment with `id` and return the updated record.
    fn update(
        &mut self,
        id: &AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, StoreError>;
}

/// In-memory store assigning sequential ids (`apt-1`, `apt-2`, ...).
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentStore {
    appointments: Vec<Appointment>,
    next_id: u64,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing appointments.
    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            next_id: appointments.len() as u64,
            appointments,
        }
    }

    pub fn all(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| &a.id == id)
    }

    fn allocate_id(&mut self) -> AppointmentId {
        loop {
            self.next_id += 1;
            let id = AppointmentId::new(format!("apt-{}", self.next_id));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

impl AppointmentStore for InMemoryAppointmentStore {
    fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect())
    }

    fn create(&mut self, appointment: NewAppointment) -> Result<Appointment, StoreError> {
        if appointment.duration_minutes == 0 {
            return Err(StoreError::Rejected(
                "duration must be positive".to_string(),
            ));
        }
        let id = self.allocate_id();
        let created = Appointment::new(
            id,
            appointment.date,
            appointment.start_time,
            appointment.duration_minutes,
        );
        self.appointments.push(created.clone());
        Ok(created)
    }

    fn update(
        &mut self,
        id: &AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, StoreError> {
        let existing = self
            .appointments
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply_to(existing);
        Ok(existing.clone())
    }
}
