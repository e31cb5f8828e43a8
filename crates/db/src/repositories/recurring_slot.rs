use crate::models::DbRecurringSlot;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use slotwise_core::models::slot::MAX_SLOTS_PER_DAY;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Advisory lock namespace for per-weekday capacity checks.
const CAPACITY_LOCK_SCOPE: i32 = 1;

/// Inserts a recurring template unless the day-of-week already holds the
/// maximum number of templates, in which case `Ok(None)` is returned.
///
/// The count and the insert run in one transaction under an advisory lock
/// keyed on the weekday, so two concurrent creates for the same day are
/// serialized and cannot both pass the cap check. Row locks are not enough
/// here: a second transaction's count would not see a row the first one
/// inserted after the snapshot was taken.
pub async fn create_recurring_slot(
    pool: &Pool<Postgres>,
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Option<DbRecurringSlot>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    // Released automatically at commit or rollback.
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(CAPACITY_LOCK_SCOPE)
        .bind(day_of_week)
        .execute(&mut *tx)
        .await?;

    let existing: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM slots WHERE day_of_week = $1
        "#,
    )
    .bind(day_of_week)
    .fetch_one(&mut *tx)
    .await?;

    if existing >= MAX_SLOTS_PER_DAY {
        tx.rollback().await?;
        return Ok(None);
    }

    let slot = sqlx::query_as::<_, DbRecurringSlot>(
        r#"
        INSERT INTO slots (id, day_of_week, start_time, end_time, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, day_of_week, start_time, end_time, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(slot))
}

pub async fn get_recurring_slot_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbRecurringSlot>> {
    let slot = sqlx::query_as::<_, DbRecurringSlot>(
        r#"
        SELECT id, day_of_week, start_time, end_time, created_at, updated_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// The template set is small and never date-filtered; expansion loads it
/// whole.
pub async fn get_all_recurring_slots(pool: &Pool<Postgres>) -> Result<Vec<DbRecurringSlot>> {
    let slots = sqlx::query_as::<_, DbRecurringSlot>(
        r#"
        SELECT id, day_of_week, start_time, end_time, created_at, updated_at
        FROM slots
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Removes a template and every exception referencing it in one transaction.
/// A partial removal is never observable.
pub async fn delete_recurring_slot_with_exceptions(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM slot_exceptions
        WHERE slot_id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}
