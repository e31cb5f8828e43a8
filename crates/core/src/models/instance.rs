use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::hhmm;

/// A concrete per-date slot produced by week expansion.
///
/// Instances are derived on every expansion call and never persisted. The
/// `id` is the owning recurring or one-time slot's id, so a mutation against
/// an instance resolves back to its source record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotInstance {
    pub id: Uuid,
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// True when the times came from a `modified` exception.
    pub is_exception: bool,
    /// False only for instances sourced from one-time slots.
    pub is_recurring: bool,
}
