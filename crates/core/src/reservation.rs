//! Pure planning for the reservation transaction.
//!
//! The storage layer locks the slot rows a run would cover and hands them to
//! [`verify_run`]; only if every expected slot is present and free does it
//! get back the ids to flip to booked. Cancellation uses [`release_plan`] on
//! the same span to find the slots to hand back.

use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::calendar::{is_on_grid, slot_count, SLOT_MINUTES};
use crate::errors::{BookingError, BookingResult};
use crate::models::time_slot::{SlotStatus, TimeSlot};

/// The run of slots a booking occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    pub staff_id: Uuid,
    pub start: NaiveDateTime,
    pub slot_count: usize,
}

impl RunSpan {
    pub fn new(staff_id: Uuid, start: NaiveDateTime, duration_minutes: i32) -> BookingResult<Self> {
        if !is_on_grid(start) {
            return Err(BookingError::InvalidInput(format!(
                "Start time {} is not aligned to the {}-minute slot grid",
                start, SLOT_MINUTES
            )));
        }

        let slot_count = slot_count(duration_minutes)?;
        if start
            .checked_add_signed(Duration::minutes(SLOT_MINUTES * slot_count as i64))
            .is_none()
        {
            return Err(BookingError::InvalidInput(format!(
                "A {}-minute run starting at {} ends outside the calendar",
                duration_minutes, start
            )));
        }

        Ok(Self {
            staff_id,
            start,
            slot_count,
        })
    }

    /// Exclusive end of the run. [`RunSpan::new`] guarantees it is representable.
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(SLOT_MINUTES * self.slot_count as i64)
    }

    /// Start time of the `index`-th slot of the run.
    pub fn slot_start(&self, index: usize) -> NaiveDateTime {
        self.start + Duration::minutes(SLOT_MINUTES * index as i64)
    }
}

/// Checks that `locked` (the staff's slots in `[span.start, span.end())`,
/// ordered by start time) is exactly the run and that every slot is free.
///
/// Returns the ids to mark booked, or `SlotConflict` naming the first slot
/// that is missing or taken.
pub fn verify_run(span: &RunSpan, locked: &[TimeSlot]) -> BookingResult<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(span.slot_count);

    for index in 0..span.slot_count {
        let expected = span.slot_start(index);
        let slot = locked
            .get(index)
            .filter(|slot| slot.staff_id == span.staff_id && slot.start_time == expected)
            .ok_or_else(|| {
                BookingError::SlotConflict(format!("no slot exists at {}", expected))
            })?;

        if slot.status != SlotStatus::Free {
            return Err(BookingError::SlotConflict(format!(
                "slot at {} is already booked",
                expected
            )));
        }
        ids.push(slot.id);
    }

    if locked.len() != span.slot_count {
        return Err(BookingError::SlotConflict(format!(
            "unexpected slots between {} and {}",
            span.start,
            span.end()
        )));
    }

    Ok(ids)
}

/// Ids of the slots in `locked` that a cancelled booking hands back.
///
/// Slots missing from `locked` (removed by a schedule regeneration) are
/// treated as already released; slots already free are left alone.
pub fn release_plan(span: &RunSpan, locked: &[TimeSlot]) -> Vec<Uuid> {
    locked
        .iter()
        .filter(|slot| {
            slot.staff_id == span.staff_id
                && slot.start_time >= span.start
                && slot.start_time < span.end()
                && slot.status == SlotStatus::Booked
        })
        .map(|slot| slot.id)
        .collect()
}
