use crate::models::DbTimeSlot;
use chrono::NaiveDateTime;
use eyre::Result;
use salonbook_core::models::time_slot::SlotStatus;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn get_slot_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbTimeSlot>>
where
    E: PgExecutor<'e>,
{
    let slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, staff_id, start_time, status
        FROM time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(slot)
}

/// Every slot of one staff member in `[from, to)`, any status.
pub async fn get_slots_in_range<'e, E>(
    executor: E,
    staff_id: Uuid,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<DbTimeSlot>>
where
    E: PgExecutor<'e>,
{
    let slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, staff_id, start_time, status
        FROM time_slots
        WHERE staff_id = $1 AND start_time >= $2 AND start_time < $3
        ORDER BY start_time ASC
        "#,
    )
    .bind(staff_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

/// Same rows as [`get_slots_in_range`], locked for the rest of the
/// transaction. Rows are not filtered by status: a waiter has to see the
/// committed status of rows another transaction just booked.
pub async fn lock_slots_in_range<'e, E>(
    executor: E,
    staff_id: Uuid,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<DbTimeSlot>>
where
    E: PgExecutor<'e>,
{
    let slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, staff_id, start_time, status
        FROM time_slots
        WHERE staff_id = $1 AND start_time >= $2 AND start_time < $3
        ORDER BY start_time ASC
        FOR UPDATE
        "#,
    )
    .bind(staff_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

/// Free slots of several staff members in `[from, to)`, ordered the way the
/// run finder expects.
pub async fn get_free_slots<'e, E>(
    executor: E,
    staff_ids: &[Uuid],
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<DbTimeSlot>>
where
    E: PgExecutor<'e>,
{
    let slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, staff_id, start_time, status
        FROM time_slots
        WHERE staff_id = ANY($1)
          AND start_time >= $2 AND start_time < $3
          AND status = 'free'
        ORDER BY staff_id ASC, start_time ASC
        "#,
    )
    .bind(staff_ids)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

/// Sets `status` on every slot in `ids`, returning how many rows changed.
pub async fn set_slot_status<'e, E>(executor: E, ids: &[Uuid], status: SlotStatus) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE time_slots
        SET status = $2
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .bind(status.as_str())
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Deletes the staff's slots in `[from, to)` except those inside the run of
/// a scheduled booking.
pub async fn delete_unreserved_slots<'e, E>(
    executor: E,
    staff_id: Uuid,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots ts
        WHERE ts.staff_id = $1
          AND ts.start_time >= $2 AND ts.start_time < $3
          AND NOT EXISTS (
              SELECT 1
              FROM bookings b
              JOIN time_slots anchor ON anchor.id = b.anchor_slot_id
              JOIN services s ON s.id = b.service_id
              WHERE b.staff_id = ts.staff_id
                AND b.status = 'scheduled'
                AND ts.start_time >= anchor.start_time
                AND ts.start_time < anchor.start_time + make_interval(mins => s.duration_minutes)
          )
        "#,
    )
    .bind(staff_id)
    .bind(from)
    .bind(to)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Bulk-inserts slots; start times the staff member already has are kept as
/// they are. Returns the number of rows written.
pub async fn insert_slots<'e, E>(
    executor: E,
    staff_id: Uuid,
    slots: &[(NaiveDateTime, SlotStatus)],
) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let starts: Vec<NaiveDateTime> = slots.iter().map(|(start, _)| *start).collect();
    let statuses: Vec<String> = slots.iter().map(|(_, status)| status.to_string()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO time_slots (id, staff_id, start_time, status)
        SELECT gen_random_uuid(), $1, t.start_time, t.status
        FROM UNNEST($2::timestamp[], $3::varchar[]) AS t(start_time, status)
        ON CONFLICT (staff_id, start_time) DO NOTHING
        "#,
    )
    .bind(staff_id)
    .bind(&starts)
    .bind(&statuses)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
