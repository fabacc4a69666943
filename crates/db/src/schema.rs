use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            cost INTEGER NOT NULL,
            duration_minutes INTEGER NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_cost CHECK (cost >= 0),
            CONSTRAINT duration_on_slot_grid CHECK (duration_minutes > 0 AND duration_minutes % 15 = 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff table; rating is derived from the two counters
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            total_rating BIGINT NOT NULL DEFAULT 0,
            num_reviews BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_counters CHECK (total_rating >= 0 AND num_reviews >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_services (
            staff_id UUID NOT NULL REFERENCES staff(id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(id) ON DELETE CASCADE,
            PRIMARY KEY (staff_id, service_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            staff_id UUID NOT NULL REFERENCES staff(id),
            start_time TIMESTAMP NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'free',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_slot_status CHECK (status IN ('free', 'booked')),
            CONSTRAINT one_slot_per_start UNIQUE (staff_id, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create clients table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clients (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            external_id VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table; anchor_slot_id is a soft reference, the slot may
    // be removed by a schedule regeneration
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            client_id UUID NOT NULL REFERENCES clients(id),
            staff_id UUID NOT NULL REFERENCES staff(id),
            service_id UUID NOT NULL REFERENCES services(id),
            anchor_slot_id UUID NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'scheduled',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_status CHECK (status IN ('scheduled', 'completed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reviews table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            booking_id UUID NOT NULL UNIQUE REFERENCES bookings(id),
            client_id UUID NOT NULL REFERENCES clients(id),
            staff_id UUID NOT NULL REFERENCES staff(id),
            rating INTEGER NOT NULL,
            text TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT rating_range CHECK (rating BETWEEN 1 AND 5)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_time_slots_staff_start ON time_slots(staff_id, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_time_slots_status ON time_slots(status)",
        "CREATE INDEX IF NOT EXISTS idx_staff_services_service_id ON staff_services(service_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_client_id ON bookings(client_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_staff_id ON bookings(staff_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_anchor_slot_id ON bookings(anchor_slot_id)",
        "CREATE INDEX IF NOT EXISTS idx_reviews_staff_id ON reviews(staff_id)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
