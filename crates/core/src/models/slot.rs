//! Persisted slot record kinds.
//!
//! Three independent record kinds back the scheduler:
//!
//! - [`RecurringSlot`]: a weekly template keyed by day-of-week. Never edited
//!   in place; per-date edits and cancellations go through exceptions.
//! - [`SlotException`]: a per-date override of one recurring occurrence.
//!   At most one exception exists per `(slot_id, exception_date)` pair.
//! - [`OneTimeSlot`]: a standalone entry for a single calendar date with no
//!   relation to the other two kinds.
//!
//! Times are wall-clock `HH:MM` values with no date or zone attached; the
//! wire format serializes them as `"HH:MM"` strings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SlotError, SlotResult};

/// Cap on concurrent recurring templates per day-of-week.
pub const MAX_SLOTS_PER_DAY: i64 = 2;

/// Serde adapter for `NaiveTime` as an `"HH:MM"` wire string.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<NaiveTime>` as an optional `"HH:MM"` string.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_str(&time.format(super::hhmm::FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .map(|s| {
                NaiveTime::parse_from_str(&s, super::hhmm::FORMAT)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

/// Parses a caller-supplied `"HH:MM"` string into a `NaiveTime`.
pub fn parse_hhmm(value: &str) -> SlotResult<NaiveTime> {
    NaiveTime::parse_from_str(value, hhmm::FORMAT)
        .map_err(|_| SlotError::Validation(format!("Invalid time '{value}'. Expected HH:MM")))
}

/// A weekly-repeating availability template.
///
/// `day_of_week` uses the 0=Sunday .. 6=Saturday convention. At most 2
/// templates may exist per day-of-week; the cap is enforced at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringSlot {
    pub id: Uuid,
    pub day_of_week: i32,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an exception overrides or cancels its occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionType {
    Modified,
    Deleted,
}

impl ExceptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionType::Modified => "modified",
            ExceptionType::Deleted => "deleted",
        }
    }
}

/// A per-date override of a single recurring occurrence.
///
/// Times are present when `kind` is `Modified` and absent when `Deleted`.
/// Exceptions are lifetime-bound to their slot: deleting the recurring slot
/// cascades to them, and they are never deleted on their own. There is no
/// transition back to the exception-free state for a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotException {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub exception_date: NaiveDate,
    #[serde(with = "hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "type")]
    pub kind: ExceptionType,
    pub created_at: DateTime<Utc>,
}

/// A standalone, non-repeating slot on a single calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OneTimeSlot {
    pub id: Uuid,
    pub slot_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /slots`.
///
/// Fields are optional so the handler can report missing values as
/// validation errors with the contract's messages instead of body
/// rejection errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_recurring: Option<bool>,
    pub selected_date: Option<NaiveDate>,
}

/// Body of `PUT /slots/:slotId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Record returned by `POST /slots`: the shape depends on which table the
/// slot landed in.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CreatedSlot {
    Recurring(RecurringSlot),
    OneTime(OneTimeSlot),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
