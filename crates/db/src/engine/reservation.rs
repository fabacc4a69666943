//! # Reservation Transaction
//!
//! `reserve` flips a run of free slots to booked and records the booking;
//! `cancel` hands the run back. Both lock the affected `time_slots` rows with
//! `SELECT ... FOR UPDATE`, so concurrent calls on overlapping runs of the
//! same staff member serialize and the loser re-reads the winner's writes.
//!
//! The service row is share-locked for the whole transaction: the duration
//! that sizes the run cannot change until the booking is committed.
//!
//! Conflicts are reported, never retried: retrying could pick a time the
//! client did not confirm.

use eyre::WrapErr;
use salonbook_core::{
    errors::{BookingError, BookingResult},
    models::{
        booking::{Booking, BookingStatus, ReserveRequest},
        time_slot::{SlotStatus, TimeSlot},
    },
    reservation::{release_plan, verify_run, RunSpan},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::convert_all;
use crate::repositories::service::RowLock;
use crate::repositories::{booking, client, service, staff, time_slot};
use crate::DbPool;

/// Reserves the run starting at `request.start_time` for the service's
/// duration and creates the booking.
///
/// # Errors
///
/// * `InvalidInput` - empty client id, off-grid start, or staff does not
///   offer the service
/// * `NotFound` - unknown service or staff
/// * `SlotConflict` - a slot of the run is missing or no longer free
pub async fn reserve(pool: &DbPool, request: &ReserveRequest) -> BookingResult<Booking> {
    let client_external_id = request.client_external_id.trim();
    if client_external_id.is_empty() {
        return Err(BookingError::InvalidInput(
            "Client id must not be empty".to_string(),
        ));
    }

    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start reservation transaction")?;

    let service = service::lock_service(&mut *tx, request.service_id, RowLock::Share)
        .await?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Service with ID {} not found", request.service_id))
        })?;

    let staff = staff::get_staff_by_id(&mut *tx, request.staff_id)
        .await?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Staff with ID {} not found", request.staff_id))
        })?;
    if !staff.service_ids.contains(&service.id) {
        return Err(BookingError::InvalidInput(format!(
            "{} does not offer {}",
            staff.name, service.name
        )));
    }

    let span = RunSpan::new(staff.id, request.start_time, service.duration_minutes)?;
    let locked: Vec<TimeSlot> = convert_all(
        time_slot::lock_slots_in_range(&mut *tx, span.staff_id, span.start, span.end()).await?,
    )?;

    let slot_ids = verify_run(&span, &locked).inspect_err(|e| {
        warn!(
            "Reservation for staff {} at {} rejected: {}",
            span.staff_id, span.start, e
        );
    })?;

    let updated = time_slot::set_slot_status(&mut *tx, &slot_ids, SlotStatus::Booked).await?;
    if updated != slot_ids.len() as u64 {
        return Err(BookingError::SlotConflict(format!(
            "only {} of {} slots could be booked",
            updated,
            slot_ids.len()
        )));
    }

    let client = client::upsert_client(&mut *tx, client_external_id).await?;
    let created = booking::create_booking(&mut *tx, client.id, staff.id, service.id, slot_ids[0]).await?;

    tx.commit()
        .await
        .wrap_err("Failed to commit reservation")?;

    info!(
        booking_id = %created.id,
        staff_id = %staff.id,
        service_id = %service.id,
        start = %span.start,
        slots = span.slot_count,
        "Booking reserved"
    );
    Ok(Booking::try_from(created)?)
}

/// Cancels a booking and frees its run.
///
/// Cancelling an already cancelled booking succeeds without touching any
/// slot. A missing anchor slot means the run was regenerated away and there
/// is nothing left to release.
///
/// # Errors
///
/// * `NotFound` - unknown booking
/// * `InvalidInput` - the booking is already completed
pub async fn cancel(pool: &DbPool, booking_id: Uuid) -> BookingResult<()> {
    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start cancellation transaction")?;

    let current = Booking::try_from(
        booking::lock_booking(&mut *tx, booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", booking_id)))?,
    )?;

    match current.status {
        BookingStatus::Cancelled => {
            info!(booking_id = %booking_id, "Booking already cancelled");
            return Ok(());
        }
        BookingStatus::Completed => {
            return Err(BookingError::InvalidInput(format!(
                "Booking {} is already completed and cannot be cancelled",
                booking_id
            )));
        }
        BookingStatus::Scheduled => {}
    }

    let service = service::lock_service(&mut *tx, current.service_id, RowLock::Share)
        .await?
        .ok_or_else(|| {
            BookingError::NotFound(format!("Service with ID {} not found", current.service_id))
        })?;

    let released = match time_slot::get_slot_by_id(&mut *tx, current.anchor_slot_id).await? {
        Some(anchor) => {
            let span = RunSpan::new(current.staff_id, anchor.start_time, service.duration_minutes)?;
            let locked: Vec<TimeSlot> = convert_all(
                time_slot::lock_slots_in_range(&mut *tx, span.staff_id, span.start, span.end())
                    .await?,
            )?;
            let to_free = release_plan(&span, &locked);
            time_slot::set_slot_status(&mut *tx, &to_free, SlotStatus::Free).await?
        }
        None => {
            warn!(
                booking_id = %booking_id,
                anchor_slot_id = %current.anchor_slot_id,
                "Anchor slot no longer exists; nothing to release"
            );
            0
        }
    };

    booking::set_booking_status(&mut *tx, booking_id, BookingStatus::Cancelled).await?;

    tx.commit()
        .await
        .wrap_err("Failed to commit cancellation")?;

    info!(booking_id = %booking_id, released, "Booking cancelled");
    Ok(())
}

/// Marks a scheduled booking as completed, which makes it reviewable.
/// Completing twice is a no-op.
///
/// # Errors
///
/// * `NotFound` - unknown booking
/// * `InvalidInput` - the booking was cancelled
pub async fn complete(pool: &DbPool, booking_id: Uuid) -> BookingResult<Booking> {
    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start completion transaction")?;

    let current = Booking::try_from(
        booking::lock_booking(&mut *tx, booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", booking_id)))?,
    )?;

    let completed = match current.status {
        BookingStatus::Completed => current,
        BookingStatus::Cancelled => {
            return Err(BookingError::InvalidInput(format!(
                "Booking {} was cancelled and cannot be completed",
                booking_id
            )));
        }
        BookingStatus::Scheduled => Booking::try_from(
            booking::set_booking_status(&mut *tx, booking_id, BookingStatus::Completed).await?,
        )?,
    };

    tx.commit()
        .await
        .wrap_err("Failed to commit completion")?;

    info!(booking_id = %booking_id, "Booking completed");
    Ok(completed)
}
