use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use slotwise_core::models::slot::{ExceptionType, OneTimeSlot, RecurringSlot, SlotException};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRecurringSlot {
    pub id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotException {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub exception_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOneTimeSlot {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbRecurringSlot> for RecurringSlot {
    fn from(row: DbRecurringSlot) -> Self {
        RecurringSlot {
            id: row.id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbSlotException> for SlotException {
    fn from(row: DbSlotException) -> Self {
        SlotException {
            id: row.id,
            slot_id: row.slot_id,
            exception_date: row.exception_date,
            start_time: row.start_time,
            end_time: row.end_time,
            // The CHECK constraint on the kind column admits only these two
            // values.
            kind: match row.kind.as_str() {
                "deleted" => ExceptionType::Deleted,
                _ => ExceptionType::Modified,
            },
            created_at: row.created_at,
        }
    }
}

impl From<DbOneTimeSlot> for OneTimeSlot {
    fn from(row: DbOneTimeSlot) -> Self {
        OneTimeSlot {
            id: row.id,
            slot_date: row.slot_date,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
