//! Tests for the booking form session over an appointment store.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use slot_engine::{
    Appointment, AppointmentStore, BookingFlow, BookingSession, FlowOutcome,
    InMemoryAppointmentStore, NewAppointment, SchedulingError, SchedulingPreferences, SlotWarning,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

fn early_morning() -> NaiveDateTime {
    day().and_time(t(6, 0))
}

fn prefs() -> SchedulingPreferences {
    SchedulingPreferences::new(t(8, 0), t(18, 0), 90)
}

fn seeded_store() -> InMemoryAppointmentStore {
    InMemoryAppointmentStore::with_appointments(vec![Appointment::new(
        "a1",
        day(),
        t(10, 0),
        60,
    )])
}

#[test]
fn new_session_rejects_zero_duration() {
    let err = BookingSession::new(day(), 0, prefs()).unwrap_err();

    assert!(matches!(err, SchedulingError::InvalidDuration(0)));
}

#[test]
fn grid_reflects_store_contents() {
    let store = seeded_store();
    let session = BookingSession::new(day(), 30, prefs()).unwrap();

    let slots = session.slot_grid(&store, early_morning()).unwrap();

    let at_ten = slots.iter().find(|s| s.start_time == t(10, 0)).unwrap();
    assert!(!at_ten.available);
}

#[test]
fn grid_uses_a_fresh_snapshot_each_time() {
    let mut store = InMemoryAppointmentStore::new();
    let session = BookingSession::new(day(), 30, prefs()).unwrap();

    let before = session.slot_grid(&store, early_morning()).unwrap();
    assert!(before.iter().all(|s| s.available));

    store
        .create(NewAppointment {
            date: day(),
            start_time: t(10, 0),
            duration_minutes: 60,
        })
        .unwrap();

    let after = session.slot_grid(&store, early_morning()).unwrap();
    let at_ten = after.iter().find(|s| s.start_time == t(10, 0)).unwrap();
    assert!(!at_ten.available, "new booking must be visible on regeneration");
}

#[test]
fn clean_selection_submits_new_booking() {
    let mut store = seeded_store();
    let mut session = BookingSession::new(day(), 30, prefs()).unwrap();

    let outcome = session.select(&store, t(13, 0), early_morning()).unwrap();
    assert_eq!(outcome, FlowOutcome::Committed { start_time: t(13, 0) });

    let created = session.submit(&mut store).unwrap();
    assert_eq!(created.start_time, t(13, 0));
    assert_eq!(store.all().len(), 2);
    assert_eq!(session.flow(), &BookingFlow::Idle);
}

#[test]
fn advisory_selection_requires_confirmation_before_submit() {
    let mut store = seeded_store();
    let mut session = BookingSession::new(day(), 30, prefs()).unwrap();

    let outcome = session.select(&store, t(9, 0), early_morning()).unwrap();
    assert!(matches!(
        outcome,
        FlowOutcome::NeedsConfirmation {
            warning: SlotWarning::InsufficientGap { actual_minutes: 30, .. },
            ..
        }
    ));

    let err = session.submit(&mut store).unwrap_err();
    assert!(matches!(err, SchedulingError::InvalidTransition { .. }));

    session.confirm_anyway().unwrap();
    let created = session.submit(&mut store).unwrap();
    assert_eq!(created.start_time, t(9, 0));
}

#[test]
fn manually_entered_overlapping_time_is_blocked() {
    let store = seeded_store();
    let mut session = BookingSession::new(day(), 30, prefs()).unwrap();

    let err = session.select(&store, t(10, 15), early_morning()).unwrap_err();

    assert!(matches!(err, SchedulingError::SlotUnavailable { .. }));
    assert_eq!(session.flow(), &BookingFlow::Idle);
}

#[test]
fn choose_another_allows_a_new_pick() {
    let store = seeded_store();
    let mut session = BookingSession::new(day(), 30, prefs()).unwrap();

    session.select(&store, t(9, 0), early_morning()).unwrap();
    session.choose_another().unwrap();

    let outcome = session.select(&store, t(13, 0), early_morning()).unwrap();
    assert_eq!(outcome, FlowOutcome::Committed { start_time: t(13, 0) });
}

#[test]
fn editing_session_moves_appointment_without_self_conflict() {
    let mut store = seeded_store();
    let original = store.all()[0].clone();
    let mut session = BookingSession::for_edit(&original, prefs()).unwrap();

    // Overlaps the original 10:00-11:00 slot, which is being moved.
    let outcome = session.select(&store, t(10, 30), early_morning()).unwrap();
    assert_eq!(outcome, FlowOutcome::Committed { start_time: t(10, 30) });

    let updated = session.submit(&mut store).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.start_time, t(10, 30));
    assert_eq!(store.all().len(), 1);
}

#[test]
fn changing_inputs_discards_pending_attempt() {
    let store = seeded_store();
    let mut session = BookingSession::new(day(), 30, prefs()).unwrap();
    session.select(&store, t(9, 0), early_morning()).unwrap();
    assert!(session.flow().pending().is_some());

    session.set_duration(45).unwrap();
    assert_eq!(session.flow(), &BookingFlow::Idle);
    assert_eq!(session.duration_minutes(), 45);

    session.select(&store, t(9, 0), early_morning()).unwrap();
    session.set_date(day().succ_opt().unwrap());
    assert_eq!(session.flow(), &BookingFlow::Idle);
}

#[test]
fn set_duration_rejects_zero() {
    let mut session = BookingSession::new(day(), 30, prefs()).unwrap();

    assert!(session.set_duration(0).is_err());
    assert_eq!(session.duration_minutes(), 30);
}
