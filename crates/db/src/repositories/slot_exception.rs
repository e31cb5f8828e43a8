use crate::models::DbSlotException;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use slotwise_core::models::slot::ExceptionType;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Writes the exception for `(slot_id, exception_date)`, replacing any prior
/// exception at that key. A modified exception carries times; a deleted one
/// stores NULLs.
pub async fn upsert_exception(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    exception_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    kind: ExceptionType,
) -> Result<DbSlotException> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let exception = sqlx::query_as::<_, DbSlotException>(
        r#"
        INSERT INTO slot_exceptions (id, slot_id, exception_date, start_time, end_time, kind, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (slot_id, exception_date)
        DO UPDATE SET start_time = EXCLUDED.start_time,
                      end_time = EXCLUDED.end_time,
                      kind = EXCLUDED.kind
        RETURNING id, slot_id, exception_date, start_time, end_time, kind, created_at
        "#,
    )
    .bind(id)
    .bind(slot_id)
    .bind(exception_date)
    .bind(start_time)
    .bind(end_time)
    .bind(kind.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(exception)
}

pub async fn get_exceptions_in_range(
    pool: &Pool<Postgres>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbSlotException>> {
    let exceptions = sqlx::query_as::<_, DbSlotException>(
        r#"
        SELECT id, slot_id, exception_date, start_time, end_time, kind, created_at
        FROM slot_exceptions
        WHERE exception_date BETWEEN $1 AND $2
        ORDER BY exception_date ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(exceptions)
}
