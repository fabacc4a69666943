use crate::models::DbReview;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

pub async fn create_review<'e, E>(
    executor: E,
    booking_id: Uuid,
    client_id: Uuid,
    staff_id: Uuid,
    rating: i32,
    text: &str,
) -> Result<DbReview>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let review = sqlx::query_as::<_, DbReview>(
        r#"
        INSERT INTO reviews (id, booking_id, client_id, staff_id, rating, text, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, booking_id, client_id, staff_id, rating, text, created_at
        "#,
    )
    .bind(id)
    .bind(booking_id)
    .bind(client_id)
    .bind(staff_id)
    .bind(rating)
    .bind(text)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(review)
}

pub async fn get_review_by_booking_id<'e, E>(executor: E, booking_id: Uuid) -> Result<Option<DbReview>>
where
    E: PgExecutor<'e>,
{
    let review = sqlx::query_as::<_, DbReview>(
        r#"
        SELECT id, booking_id, client_id, staff_id, rating, text, created_at
        FROM reviews
        WHERE booking_id = $1
        "#,
    )
    .bind(booking_id)
    .fetch_optional(executor)
    .await?;

    Ok(review)
}

/// Deletes a review, returning the removed row so its rating can be
/// withdrawn from the staff counters.
pub async fn delete_review<'e, E>(executor: E, id: Uuid) -> Result<Option<DbReview>>
where
    E: PgExecutor<'e>,
{
    let review = sqlx::query_as::<_, DbReview>(
        r#"
        DELETE FROM reviews
        WHERE id = $1
        RETURNING id, booking_id, client_id, staff_id, rating, text, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(review)
}

pub async fn list_reviews_for_staff(pool: &Pool<Postgres>, staff_id: Uuid) -> Result<Vec<DbReview>> {
    let reviews = sqlx::query_as::<_, DbReview>(
        r#"
        SELECT id, booking_id, client_id, staff_id, rating, text, created_at
        FROM reviews
        WHERE staff_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(staff_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}
