use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create slots table (recurring weekly templates)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slot_exceptions table; the unique constraint on
    // (slot_id, exception_date) is what the upsert-merge operations rely on
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slot_exceptions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_id UUID NOT NULL REFERENCES slots(id) ON DELETE CASCADE,
            exception_date DATE NOT NULL,
            start_time TIME NULL,
            end_time TIME NULL,
            kind VARCHAR(10) NOT NULL CHECK (kind IN ('modified', 'deleted')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_slot_exception UNIQUE (slot_id, exception_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create one_time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS one_time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            slot_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_one_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_slots_day_of_week ON slots(day_of_week);
        CREATE INDEX IF NOT EXISTS idx_slot_exceptions_exception_date ON slot_exceptions(exception_date);
        CREATE INDEX IF NOT EXISTS idx_slot_exceptions_slot_id ON slot_exceptions(slot_id);
        CREATE INDEX IF NOT EXISTS idx_one_time_slots_slot_date ON one_time_slots(slot_date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
