use crate::models::DbService;
use chrono::Utc;
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

pub async fn create_service(
    pool: &Pool<Postgres>,
    name: &str,
    cost: i32,
    duration_minutes: i32,
) -> Result<DbService> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, name, cost, duration_minutes, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, cost, duration_minutes, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(cost)
    .bind(duration_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbService>>
where
    E: PgExecutor<'e>,
{
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, cost, duration_minutes, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(service)
}

/// Reads a service and holds a row lock on it until the transaction ends.
///
/// `Share` locks coexist with each other; `Update` waits for every holder and
/// blocks new ones. A run is sized from the duration read under the lock.
pub async fn lock_service<'e, E>(executor: E, id: Uuid, mode: RowLock) -> Result<Option<DbService>>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT id, name, cost, duration_minutes, created_at FROM services WHERE id = $1 {}",
        mode.clause()
    );

    let service = sqlx::query_as::<_, DbService>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(service)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    Share,
    Update,
}

impl RowLock {
    fn clause(self) -> &'static str {
        match self {
            RowLock::Share => "FOR SHARE",
            RowLock::Update => "FOR UPDATE",
        }
    }
}

pub async fn list_services(pool: &Pool<Postgres>) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, cost, duration_minutes, created_at
        FROM services
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn update_service<'e, E>(
    executor: E,
    id: Uuid,
    name: &str,
    cost: i32,
    duration_minutes: i32,
) -> Result<DbService>
where
    E: PgExecutor<'e>,
{
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = $2, cost = $3, duration_minutes = $4
        WHERE id = $1
        RETURNING id, name, cost, duration_minutes, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(cost)
    .bind(duration_minutes)
    .fetch_one(executor)
    .await?;

    Ok(service)
}

/// Ids among `ids` that have no service row.
pub async fn missing_service_ids<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<Uuid>>
where
    E: PgExecutor<'e>,
{
    let missing = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT requested.id
        FROM UNNEST($1::uuid[]) AS requested(id)
        LEFT JOIN services s ON s.id = requested.id
        WHERE s.id IS NULL
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await?;

    Ok(missing)
}
