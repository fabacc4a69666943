use crate::models::DbStaff;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

pub async fn create_staff<'e, E>(executor: E, name: &str) -> Result<DbStaff>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        INSERT INTO staff (id, name, created_at)
        VALUES ($1, $2, $3)
        RETURNING id, name, total_rating, num_reviews, '{}'::uuid[] AS service_ids, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(staff)
}

pub async fn get_staff_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbStaff>>
where
    E: PgExecutor<'e>,
{
    tracing::debug!("Getting staff by id: {}", id);

    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        SELECT s.id, s.name, s.total_rating, s.num_reviews,
               COALESCE(
                   array_agg(ss.service_id ORDER BY ss.service_id)
                       FILTER (WHERE ss.service_id IS NOT NULL),
                   '{}'
               ) AS service_ids,
               s.created_at
        FROM staff s
        LEFT JOIN staff_services ss ON ss.staff_id = s.id
        WHERE s.id = $1
        GROUP BY s.id
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(staff)
}

/// All staff, or only those offering `service_id` when given.
pub async fn list_staff(pool: &Pool<Postgres>, service_id: Option<Uuid>) -> Result<Vec<DbStaff>> {
    let staff = sqlx::query_as::<_, DbStaff>(
        r#"
        SELECT s.id, s.name, s.total_rating, s.num_reviews,
               COALESCE(
                   array_agg(ss.service_id ORDER BY ss.service_id)
                       FILTER (WHERE ss.service_id IS NOT NULL),
                   '{}'
               ) AS service_ids,
               s.created_at
        FROM staff s
        LEFT JOIN staff_services ss ON ss.staff_id = s.id
        WHERE $1::uuid IS NULL
           OR EXISTS (
               SELECT 1 FROM staff_services offered
               WHERE offered.staff_id = s.id AND offered.service_id = $1
           )
        GROUP BY s.id
        ORDER BY s.name ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    Ok(staff)
}

pub async fn get_staff_ids_offering<'e, E>(executor: E, service_id: Uuid) -> Result<Vec<Uuid>>
where
    E: PgExecutor<'e>,
{
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT staff_id
        FROM staff_services
        WHERE service_id = $1
        ORDER BY staff_id ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

pub async fn clear_staff_services<'e, E>(executor: E, staff_id: Uuid) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        DELETE FROM staff_services
        WHERE staff_id = $1
        "#,
    )
    .bind(staff_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn add_staff_services<'e, E>(executor: E, staff_id: Uuid, service_ids: &[Uuid]) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO staff_services (staff_id, service_id)
        SELECT $1, service_id FROM UNNEST($2::uuid[]) AS t(service_id)
        ON CONFLICT (staff_id, service_id) DO NOTHING
        "#,
    )
    .bind(staff_id)
    .bind(service_ids)
    .execute(executor)
    .await?;

    Ok(())
}

/// Applies a review's contribution to the rating counters. Pass negative
/// deltas to withdraw a review.
pub async fn adjust_rating<'e, E>(
    executor: E,
    staff_id: Uuid,
    rating_delta: i64,
    count_delta: i64,
) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE staff
        SET total_rating = total_rating + $2, num_reviews = num_reviews + $3
        WHERE id = $1
        "#,
    )
    .bind(staff_id)
    .bind(rating_delta)
    .bind(count_delta)
    .execute(executor)
    .await?;

    Ok(())
}
