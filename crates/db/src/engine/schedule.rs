//! Schedule definition: the admin bulk-write of a staff member's slot grid.

use chrono::{Duration, NaiveDate};
use eyre::WrapErr;
use salonbook_core::{
    calendar::{BookingPolicy, ensure_distinct_days, expand_day, start_of_day},
    errors::{BookingError, BookingResult},
    models::{
        schedule::{DaySchedule, DefineScheduleResponse},
        time_slot::TimeSlot,
    },
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::convert_all;
use crate::repositories::{staff, time_slot};
use crate::DbPool;

/// Rewrites the slot grid of every listed day for one staff member.
///
/// The whole request is one transaction. Slots inside the run of a scheduled
/// booking survive the rewrite unchanged, so regenerating a day never frees
/// or duplicates a reserved slot.
pub async fn define_schedule(
    pool: &DbPool,
    staff_id: Uuid,
    days: &[DaySchedule],
    policy: &BookingPolicy,
) -> BookingResult<DefineScheduleResponse> {
    ensure_distinct_days(days)?;
    let expanded = days
        .iter()
        .map(|day| expand_day(day, policy).map(|slots| (day.date, slots)))
        .collect::<BookingResult<Vec<_>>>()?;

    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start schedule transaction")?;

    if staff::get_staff_by_id(&mut *tx, staff_id).await?.is_none() {
        return Err(BookingError::NotFound(format!(
            "Staff with ID {} not found",
            staff_id
        )));
    }

    let mut slots_written = 0u64;
    for (date, slots) in &expanded {
        let from = start_of_day(*date);
        let to = from + Duration::days(1);

        time_slot::lock_slots_in_range(&mut *tx, staff_id, from, to).await?;
        let removed = time_slot::delete_unreserved_slots(&mut *tx, staff_id, from, to).await?;
        let written = time_slot::insert_slots(&mut *tx, staff_id, slots).await?;
        debug!(
            staff_id = %staff_id,
            date = %date,
            removed,
            written,
            "Regenerated day"
        );
        slots_written += written;
    }

    tx.commit()
        .await
        .wrap_err("Failed to commit schedule")?;

    info!(
        staff_id = %staff_id,
        days = expanded.len(),
        slots_written,
        "Schedule defined"
    );
    Ok(DefineScheduleResponse {
        days: expanded.len(),
        slots_written: slots_written as usize,
    })
}

/// All slots of a staff member from `from` through `to`, both dates inclusive.
pub async fn staff_schedule(
    pool: &DbPool,
    staff_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> BookingResult<Vec<TimeSlot>> {
    if to < from {
        return Err(BookingError::InvalidInput(format!(
            "Range end {} is before its start {}",
            to, from
        )));
    }
    if staff::get_staff_by_id(pool, staff_id).await?.is_none() {
        return Err(BookingError::NotFound(format!(
            "Staff with ID {} not found",
            staff_id
        )));
    }

    let rows = time_slot::get_slots_in_range(
        pool,
        staff_id,
        start_of_day(from),
        start_of_day(to) + Duration::days(1),
    )
    .await?;
    Ok(convert_all(rows)?)
}
