//! Error types for slot-engine operations.

use chrono::NaiveTime;
use thiserror::Error;

use crate::appointment::AppointmentId;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(u32),

    #[error("Invalid scheduling preferences: {0}")]
    InvalidPreferences(String),

    #[error("Slot at {} is unavailable: it overlaps an existing appointment", .start_time.format("%H:%M"))]
    SlotUnavailable { start_time: NaiveTime },

    #[error("Cannot apply '{event}' while booking flow is {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("Appointment store failure: {0}")]
    Store(#[from] StoreError),
}

/// Failures reported by an [`AppointmentStore`](crate::store::AppointmentStore).
///
/// The engine treats these as opaque; they are passed back to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Appointment not found: {0}")]
    NotFound(AppointmentId),

    #[error("Rejected by store: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
