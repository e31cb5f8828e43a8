use crate::models::DbOneTimeSlot;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_one_time_slot(
    pool: &Pool<Postgres>,
    slot_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbOneTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbOneTimeSlot>(
        r#"
        INSERT INTO one_time_slots (id, slot_date, start_time, end_time, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, slot_date, start_time, end_time, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(slot_date)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_one_time_slot_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbOneTimeSlot>> {
    let slot = sqlx::query_as::<_, DbOneTimeSlot>(
        r#"
        SELECT id, slot_date, start_time, end_time, created_at, updated_at
        FROM one_time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_one_time_slots_in_range(
    pool: &Pool<Postgres>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbOneTimeSlot>> {
    let slots = sqlx::query_as::<_, DbOneTimeSlot>(
        r#"
        SELECT id, slot_date, start_time, end_time, created_at, updated_at
        FROM one_time_slots
        WHERE slot_date BETWEEN $1 AND $2
        ORDER BY slot_date ASC, start_time ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn update_one_time_slot(
    pool: &Pool<Postgres>,
    id: Uuid,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE one_time_slots
        SET start_time = $2, end_time = $3, updated_at = $4
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(start_time)
    .bind(end_time)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_one_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM one_time_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
