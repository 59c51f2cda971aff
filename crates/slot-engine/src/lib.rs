//! # slot-engine
//!
//! Appointment availability and conflict resolution for day-view booking forms.
//!
//! Given a day's existing appointments and a proposed booking (date, start time,
//! duration), the engine classifies the slot as free, blocked by an overlap, or
//! free but advisory (in the past, or closer to a neighbor than the preferred
//! gap). It generates the full grid of candidate slots for a day and drives the
//! warn-then-confirm protocol that turns a selection into a committed booking.
//!
//! Evaluation and grid generation are pure, synchronous functions of their
//! inputs; the only I/O goes through the [`AppointmentStore`] trait.
//!
//! ## Modules
//!
//! - [`evaluator`] — classify one candidate start time
//! - [`generator`] — build the day's slot grid
//! - [`confirmation`] — booking confirmation state machine and commit
//! - [`freebusy`] — free windows within business hours
//! - [`session`] — a booking form session over a store
//! - [`store`] — appointment store trait and in-memory implementation
//! - [`interval`] — half-open interval overlap and gap arithmetic
//! - [`appointment`], [`preferences`] — input data types
//! - [`timefmt`] — `"HH:MM"` serde adapters
//! - [`error`] — Error types

pub mod appointment;
pub mod confirmation;
pub mod error;
pub mod evaluator;
pub mod freebusy;
pub mod generator;
pub mod interval;
pub mod preferences;
pub mod session;
pub mod store;
pub mod timefmt;

pub use appointment::{Appointment, AppointmentId, AppointmentStatus};
pub use confirmation::{commit, BookingAttempt, BookingFlow, FlowEvent, FlowOutcome};
pub use error::{SchedulingError, StoreError};
pub use evaluator::{evaluate, validate_request, Evaluation, SlotWarning};
pub use freebusy::{find_first_free_window, find_free_windows, FreeWindow};
pub use generator::{available_slots, first_clean_slot, generate, CandidateSlot, GridSummary};
pub use interval::TimeInterval;
pub use preferences::SchedulingPreferences;
pub use session::BookingSession;
pub use store::{AppointmentPatch, AppointmentStore, InMemoryAppointmentStore, NewAppointment};
