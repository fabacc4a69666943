//! Services, staff and the set of services each staff member offers.

use eyre::WrapErr;
use salonbook_core::{
    calendar::slot_count,
    errors::{BookingError, BookingResult},
    models::{
        service::{CreateServiceRequest, Service, UpdateServiceRequest},
        staff::{CreateStaffRequest, Staff},
    },
};
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

use crate::repositories::service::RowLock;
use crate::repositories::{booking, service, staff};
use crate::DbPool;

fn validate_service(name: &str, cost: i32, duration_minutes: i32) -> BookingResult<()> {
    if name.trim().is_empty() {
        return Err(BookingError::InvalidInput(
            "Service name must not be empty".to_string(),
        ));
    }
    if cost < 0 {
        return Err(BookingError::InvalidInput(format!(
            "Service cost must not be negative, got {}",
            cost
        )));
    }
    slot_count(duration_minutes)?;
    Ok(())
}

pub async fn create_service(pool: &DbPool, request: &CreateServiceRequest) -> BookingResult<Service> {
    validate_service(&request.name, request.cost, request.duration_minutes)?;

    let created = service::create_service(
        pool,
        request.name.trim(),
        request.cost,
        request.duration_minutes,
    )
    .await?;

    info!(service_id = %created.id, name = %created.name, "Service created");
    Ok(created.into())
}

/// Applies a partial update.
///
/// The duration of a service with scheduled bookings is frozen: cancelling
/// those bookings recomputes their runs from the current duration.
pub async fn update_service(
    pool: &DbPool,
    id: Uuid,
    request: &UpdateServiceRequest,
) -> BookingResult<Service> {
    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start service update transaction")?;

    let current: Service = service::lock_service(&mut *tx, id, RowLock::Update)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", id)))?
        .into();

    let name = request.name.as_deref().unwrap_or(&current.name).trim().to_string();
    let cost = request.cost.unwrap_or(current.cost);
    let duration_minutes = request.duration_minutes.unwrap_or(current.duration_minutes);
    validate_service(&name, cost, duration_minutes)?;

    if duration_minutes != current.duration_minutes {
        let scheduled = booking::count_scheduled_for_service(&mut *tx, id).await?;
        if scheduled > 0 {
            return Err(BookingError::InvalidInput(format!(
                "Cannot change the duration of {} while it has {} scheduled bookings",
                current.name, scheduled
            )));
        }
    }

    let updated = service::update_service(&mut *tx, id, &name, cost, duration_minutes).await?;

    tx.commit()
        .await
        .wrap_err("Failed to commit service update")?;

    info!(service_id = %id, "Service updated");
    Ok(updated.into())
}

pub async fn list_services(pool: &DbPool) -> BookingResult<Vec<Service>> {
    let rows = service::list_services(pool).await?;
    Ok(rows.into_iter().map(Service::from).collect())
}

pub async fn get_service(pool: &DbPool, id: Uuid) -> BookingResult<Service> {
    service::get_service_by_id(pool, id)
        .await?
        .map(Service::from)
        .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", id)))
}

async fn ensure_services_exist(conn: &mut PgConnection, service_ids: &[Uuid]) -> BookingResult<()> {
    let missing = service::missing_service_ids(conn, service_ids).await?;
    if let Some(first) = missing.first() {
        return Err(BookingError::NotFound(format!(
            "Service with ID {} not found",
            first
        )));
    }
    Ok(())
}

fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

pub async fn create_staff(pool: &DbPool, request: &CreateStaffRequest) -> BookingResult<Staff> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(BookingError::InvalidInput(
            "Staff name must not be empty".to_string(),
        ));
    }
    let service_ids = dedup(&request.service_ids);

    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start staff transaction")?;

    ensure_services_exist(&mut *tx, &service_ids).await?;
    let created = staff::create_staff(&mut *tx, name).await?;
    staff::add_staff_services(&mut *tx, created.id, &service_ids).await?;

    tx.commit()
        .await
        .wrap_err("Failed to commit staff")?;

    info!(staff_id = %created.id, name = %created.name, services = service_ids.len(), "Staff created");
    Ok(Staff {
        service_ids,
        ..created.into()
    })
}

pub async fn list_staff(pool: &DbPool, service_id: Option<Uuid>) -> BookingResult<Vec<Staff>> {
    let rows = staff::list_staff(pool, service_id).await?;
    Ok(rows.into_iter().map(Staff::from).collect())
}

pub async fn get_staff(pool: &DbPool, id: Uuid) -> BookingResult<Staff> {
    staff::get_staff_by_id(pool, id)
        .await?
        .map(Staff::from)
        .ok_or_else(|| BookingError::NotFound(format!("Staff with ID {} not found", id)))
}

/// Replaces the set of services a staff member offers.
///
/// Existing bookings keep their service; the new set only affects future
/// availability and reservations.
pub async fn set_staff_services(pool: &DbPool, id: Uuid, service_ids: &[Uuid]) -> BookingResult<Staff> {
    let service_ids = dedup(service_ids);

    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start staff services transaction")?;

    if staff::get_staff_by_id(&mut *tx, id).await?.is_none() {
        return Err(BookingError::NotFound(format!("Staff with ID {} not found", id)));
    }
    ensure_services_exist(&mut *tx, &service_ids).await?;
    staff::clear_staff_services(&mut *tx, id).await?;
    staff::add_staff_services(&mut *tx, id, &service_ids).await?;

    let updated = staff::get_staff_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Staff with ID {} not found", id)))?;

    tx.commit()
        .await
        .wrap_err("Failed to commit staff services")?;

    info!(staff_id = %id, services = service_ids.len(), "Staff services replaced");
    Ok(updated.into())
}
