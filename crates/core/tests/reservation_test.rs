use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use salonbook_core::errors::BookingError;
use salonbook_core::models::time_slot::{SlotStatus, TimeSlot};
use salonbook_core::reservation::{release_plan, verify_run, RunSpan};
use uuid::Uuid;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, 4)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn slot(staff_id: Uuid, hour: u32, minute: u32, status: SlotStatus) -> TimeSlot {
    TimeSlot {
        id: Uuid::new_v4(),
        staff_id,
        start_time: at(hour, minute),
        status,
    }
}

#[test]
fn test_run_span_bounds() {
    let staff = Uuid::new_v4();
    let span = RunSpan::new(staff, at(10, 0), 45).unwrap();

    assert_eq!(span.slot_count, 3);
    assert_eq!(span.slot_start(2), at(10, 30));
    assert_eq!(span.end(), at(10, 45));
}

#[test]
fn test_run_span_rejects_run_past_end_of_calendar() {
    let staff = Uuid::new_v4();
    let late = NaiveDate::MAX.and_hms_opt(23, 30, 0).unwrap();

    assert_eq!(RunSpan::new(staff, late, 15).unwrap().end(), NaiveDate::MAX.and_hms_opt(23, 45, 0).unwrap());
    let result = RunSpan::new(staff, late, 30);
    assert!(matches!(result, Err(BookingError::InvalidInput(_))));
}

#[test]
fn test_run_span_rejects_off_grid_start() {
    let staff = Uuid::new_v4();
    let result = RunSpan::new(staff, at(10, 5), 30);
    assert!(matches!(result, Err(BookingError::InvalidInput(_))));
}

#[test]
fn test_run_span_rejects_bad_duration() {
    let staff = Uuid::new_v4();
    assert!(matches!(RunSpan::new(staff, at(10, 0), 25), Err(BookingError::InvalidInput(_))));
    assert!(matches!(RunSpan::new(staff, at(10, 0), 0), Err(BookingError::InvalidInput(_))));
}

#[test]
fn test_verify_run_returns_ids_in_order() {
    let staff = Uuid::new_v4();
    let locked = vec![
        slot(staff, 10, 0, SlotStatus::Free),
        slot(staff, 10, 15, SlotStatus::Free),
    ];
    let span = RunSpan::new(staff, at(10, 0), 30).unwrap();

    let ids = verify_run(&span, &locked).unwrap();
    assert_eq!(ids, vec![locked[0].id, locked[1].id]);
}

#[test]
fn test_verify_run_conflicts_on_booked_slot() {
    let staff = Uuid::new_v4();
    let locked = vec![
        slot(staff, 10, 0, SlotStatus::Free),
        slot(staff, 10, 15, SlotStatus::Booked),
    ];
    let span = RunSpan::new(staff, at(10, 0), 30).unwrap();

    assert!(matches!(verify_run(&span, &locked), Err(BookingError::SlotConflict(_))));
}

#[test]
fn test_verify_run_conflicts_on_missing_slot() {
    let staff = Uuid::new_v4();
    let span = RunSpan::new(staff, at(10, 0), 45).unwrap();

    let gap = vec![
        slot(staff, 10, 0, SlotStatus::Free),
        slot(staff, 10, 30, SlotStatus::Free),
    ];
    assert!(matches!(verify_run(&span, &gap), Err(BookingError::SlotConflict(_))));

    assert!(matches!(verify_run(&span, &[]), Err(BookingError::SlotConflict(_))));
}

#[test]
fn test_verify_run_conflicts_on_foreign_staff() {
    let staff = Uuid::new_v4();
    let other = Uuid::new_v4();
    let locked = vec![
        slot(staff, 10, 0, SlotStatus::Free),
        slot(other, 10, 15, SlotStatus::Free),
    ];
    let span = RunSpan::new(staff, at(10, 0), 30).unwrap();

    assert!(matches!(verify_run(&span, &locked), Err(BookingError::SlotConflict(_))));
}

#[test]
fn test_release_plan_skips_missing_and_free_slots() {
    let staff = Uuid::new_v4();
    let span = RunSpan::new(staff, at(10, 0), 45).unwrap();
    // 10:15 was regenerated away, 10:30 is already free, 10:45 is outside the run.
    let locked = vec![
        slot(staff, 10, 0, SlotStatus::Booked),
        slot(staff, 10, 30, SlotStatus::Free),
        slot(staff, 10, 45, SlotStatus::Booked),
    ];

    assert_eq!(release_plan(&span, &locked), vec![locked[0].id]);
}

#[test]
fn test_release_plan_after_release_is_empty() {
    let staff = Uuid::new_v4();
    let span = RunSpan::new(staff, at(10, 0), 30).unwrap();
    let locked = vec![
        slot(staff, 10, 0, SlotStatus::Free),
        slot(staff, 10, 15, SlotStatus::Free),
    ];

    assert!(release_plan(&span, &locked).is_empty());
}
