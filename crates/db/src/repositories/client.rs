use crate::models::DbClient;
use chrono::Utc;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Returns the client with `external_id`, creating it on first sight.
pub async fn upsert_client<'e, E>(executor: E, external_id: &str) -> Result<DbClient>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let client = sqlx::query_as::<_, DbClient>(
        r#"
        INSERT INTO clients (id, external_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (external_id)
        DO UPDATE SET external_id = EXCLUDED.external_id
        RETURNING id, external_id, created_at
        "#,
    )
    .bind(id)
    .bind(external_id)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(client)
}

pub async fn get_client_by_external_id<'e, E>(executor: E, external_id: &str) -> Result<Option<DbClient>>
where
    E: PgExecutor<'e>,
{
    let client = sqlx::query_as::<_, DbClient>(
        r#"
        SELECT id, external_id, created_at
        FROM clients
        WHERE external_id = $1
        "#,
    )
    .bind(external_id)
    .fetch_optional(executor)
    .await?;

    Ok(client)
}
