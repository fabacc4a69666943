//! The slot-run finder.
//!
//! Given slots ordered by `(staff_id, start_time)`, locate runs of
//! consecutive free slots of one staff member long enough to cover a service.
//! Runs are taken greedily left to right and never overlap: once a run is
//! emitted the scan resumes after its last slot.

use crate::calendar::{slot_step, SLOT_MINUTES};
use crate::models::time_slot::TimeSlot;

/// Returns the first slot of every run found in `slots`.
///
/// `required_minutes` is divided by the slot length with truncation; a
/// requirement shorter than one slot yields no runs.
pub fn find_runs(slots: &[TimeSlot], required_minutes: u32) -> Vec<TimeSlot> {
    let required = (i64::from(required_minutes) / SLOT_MINUTES) as usize;
    let mut starts = Vec::new();
    if required == 0 {
        return starts;
    }

    let mut i = 0;
    while i < slots.len() {
        if is_run(&slots[i..], required) {
            starts.push(slots[i].clone());
            i += required;
        } else {
            i += 1;
        }
    }

    starts
}

/// Whether the first `required` entries of `window` form a valid run.
fn is_run(window: &[TimeSlot], required: usize) -> bool {
    let Some(candidate) = window.get(..required) else {
        return false;
    };
    let staff_id = candidate[0].staff_id;

    candidate
        .iter()
        .all(|slot| slot.staff_id == staff_id && slot.is_free())
        && candidate.windows(2).all(|pair| follows(&pair[0], &pair[1]))
}

/// `next` starts exactly one slot after `prev`.
pub(crate) fn follows(prev: &TimeSlot, next: &TimeSlot) -> bool {
    next.start_time == prev.start_time + slot_step()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::models::time_slot::SlotStatus;

    fn slot(staff_id: Uuid, hour: u32, minute: u32) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            staff_id,
            start_time: NaiveDate::from_ymd_opt(2024, 12, 4)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            status: SlotStatus::Free,
        }
    }

    #[test]
    fn follows_requires_exact_step() {
        let staff = Uuid::new_v4();
        assert!(follows(&slot(staff, 10, 0), &slot(staff, 10, 15)));
        assert!(!follows(&slot(staff, 10, 0), &slot(staff, 10, 30)));
        assert!(!follows(&slot(staff, 10, 15), &slot(staff, 10, 0)));
    }

    #[test]
    fn is_run_rejects_short_window() {
        let staff = Uuid::new_v4();
        let slots = vec![slot(staff, 10, 0)];
        assert!(!is_run(&slots, 2));
        assert!(is_run(&slots, 1));
    }
}
