use crate::models::{DbBooking, DbBookingDetails};
use chrono::Utc;
use eyre::Result;
use salonbook_core::models::booking::BookingStatus;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

pub async fn create_booking<'e, E>(
    executor: E,
    client_id: Uuid,
    staff_id: Uuid,
    service_id: Uuid,
    anchor_slot_id: Uuid,
) -> Result<DbBooking>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, client_id, staff_id, service_id, anchor_slot_id, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, client_id, staff_id, service_id, anchor_slot_id, status, created_at
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(staff_id)
    .bind(service_id)
    .bind(anchor_slot_id)
    .bind(BookingStatus::Scheduled.as_str())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbBooking>>
where
    E: PgExecutor<'e>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, staff_id, service_id, anchor_slot_id, status, created_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

/// Loads a booking and holds its row lock until the transaction ends.
pub async fn lock_booking<'e, E>(executor: E, id: Uuid) -> Result<Option<DbBooking>>
where
    E: PgExecutor<'e>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, staff_id, service_id, anchor_slot_id, status, created_at
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

pub async fn set_booking_status<'e, E>(executor: E, id: Uuid, status: BookingStatus) -> Result<DbBooking>
where
    E: PgExecutor<'e>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = $2
        WHERE id = $1
        RETURNING id, client_id, staff_id, service_id, anchor_slot_id, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(executor)
    .await?;

    Ok(booking)
}

pub async fn count_scheduled_for_service<'e, E>(executor: E, service_id: Uuid) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM bookings
        WHERE service_id = $1 AND status = 'scheduled'
        "#,
    )
    .bind(service_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

const DETAILS_SELECT: &str = r#"
    SELECT b.id, c.external_id AS client_external_id,
           b.staff_id, st.name AS staff_name,
           b.service_id, sv.name AS service_name, sv.duration_minutes,
           anchor.start_time, b.status, b.created_at
    FROM bookings b
    JOIN clients c ON c.id = b.client_id
    JOIN staff st ON st.id = b.staff_id
    JOIN services sv ON sv.id = b.service_id
    LEFT JOIN time_slots anchor ON anchor.id = b.anchor_slot_id
"#;

pub async fn list_bookings_for_client(
    pool: &Pool<Postgres>,
    external_id: &str,
) -> Result<Vec<DbBookingDetails>> {
    let sql = format!(
        "{} WHERE c.external_id = $1 ORDER BY anchor.start_time DESC NULLS LAST, b.created_at DESC",
        DETAILS_SELECT
    );

    let bookings = sqlx::query_as::<_, DbBookingDetails>(&sql)
        .bind(external_id)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

pub async fn list_bookings_for_staff(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
) -> Result<Vec<DbBookingDetails>> {
    let sql = format!(
        "{} WHERE b.staff_id = $1 ORDER BY anchor.start_time DESC NULLS LAST, b.created_at DESC",
        DETAILS_SELECT
    );

    let bookings = sqlx::query_as::<_, DbBookingDetails>(&sql)
        .bind(staff_id)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}
