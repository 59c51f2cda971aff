//! Appointment records as supplied by the appointment store.
//!
//! The engine never mutates these. Existing data is taken as-is: an appointment
//! may run past business hours (or past midnight) and is still compared purely
//! by interval overlap.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;

/// Opaque appointment identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AppointmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    /// Cancelled appointments free their time; they never conflict.
    Cancelled,
}

/// An existing booking on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub date: NaiveDate,
    #[serde(with = "crate::timefmt")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn new(
        id: impl Into<AppointmentId>,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            start_time,
            duration_minutes,
            status: AppointmentStatus::Scheduled,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Start instant on the appointment's date.
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Half-open `[start, start + duration)` interval.
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.start(), self.duration_minutes)
    }

    /// End instant; may fall on the following day.
    pub fn end(&self) -> NaiveDateTime {
        self.interval().end
    }

    /// Whether the appointment takes part in conflict checks.
    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}

/// Active appointments on `date`, minus the one being edited.
///
/// This is the set every availability computation reasons about.
pub(crate) fn blocking<'a>(
    appointments: &'a [Appointment],
    date: NaiveDate,
    editing: Option<&'a AppointmentId>,
) -> impl Iterator<Item = &'a Appointment> + 'a {
    appointments
        .iter()
        .filter(move |a| a.date == date && a.is_active() && Some(&a.id) != editing)
}
