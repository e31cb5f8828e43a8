//! # Slot Handlers
//!
//! Handlers for the slot management endpoints: creating recurring templates
//! and one-time slots, expanding a week into concrete instances, and the
//! per-occurrence mutations that go through the exception mechanism.
//!
//! ## Mutation dispatch
//!
//! A slot id on the mutation surface can belong to either table. Updates and
//! single-occurrence deletes resolve the id against `one_time_slots` first
//! and fall back to `slots`; a one-time slot is edited or removed directly,
//! while a recurring slot gets an exception upserted for the requested date.
//! The `(slot_id, exception_date)` unique key makes repeated writes replace
//! the prior exception, so a modified occurrence that is then deleted ends up
//! with a single `deleted` exception row. An exception is never removed on
//! its own; once a date has one there is no transition back to the plain
//! template occurrence.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Days, Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use slotwise_core::{
    errors::SlotError,
    expansion::expand_week,
    models::{
        instance::SlotInstance,
        slot::{
            parse_hhmm, CreateSlotRequest, CreatedSlot, ExceptionType, MessageResponse,
            UpdateSlotRequest,
        },
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the week expansion endpoint
#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// First day of the 7-day window, `YYYY-MM-DD`
    #[serde(rename = "weekStart")]
    pub week_start: Option<String>,
}

/// Query parameters for per-occurrence mutations
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Occurrence date, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// A create request with its inputs validated and parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedCreate {
    Recurring {
        day_of_week: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
    OneTime {
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
}

pub fn parse_date(value: &str) -> Result<NaiveDate, SlotError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SlotError::Validation(format!("Invalid date '{value}'. Expected YYYY-MM-DD")))
}

fn require_times(
    start_time: &Option<String>,
    end_time: &Option<String>,
) -> Result<(NaiveTime, NaiveTime), SlotError> {
    let (Some(start), Some(end)) = (start_time, end_time) else {
        return Err(SlotError::Validation(
            "start_time and end_time are required".to_string(),
        ));
    };
    Ok((parse_hhmm(start)?, parse_hhmm(end)?))
}

/// Validates a create request into one of the two slot kinds.
///
/// A request is recurring unless `is_recurring` is explicitly false. One-time
/// creation defaults to the current date when `selected_date` is omitted.
pub fn validate_create_request(payload: &CreateSlotRequest) -> Result<ValidatedCreate, SlotError> {
    // An out-of-range day_of_week is rejected before branching, so a
    // one-time request carrying one fails too.
    if let Some(day_of_week) = payload.day_of_week {
        if !(0..=6).contains(&day_of_week) {
            return Err(SlotError::Validation(
                "Invalid day_of_week. Must be 0-6.".to_string(),
            ));
        }
    }

    let (start_time, end_time) = require_times(&payload.start_time, &payload.end_time)?;

    if payload.is_recurring == Some(false) {
        let slot_date = payload
            .selected_date
            .unwrap_or_else(|| Local::now().date_naive());
        return Ok(ValidatedCreate::OneTime {
            slot_date,
            start_time,
            end_time,
        });
    }

    let day_of_week = payload.day_of_week.ok_or_else(|| {
        SlotError::Validation("Invalid day_of_week. Must be 0-6.".to_string())
    })?;

    Ok(ValidatedCreate::Recurring {
        day_of_week,
        start_time,
        end_time,
    })
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<CreatedSlot>), AppError> {
    let created = match validate_create_request(&payload)? {
        ValidatedCreate::OneTime {
            slot_date,
            start_time,
            end_time,
        } => {
            // No capacity check applies to one-time slots.
            let slot = slotwise_db::repositories::one_time_slot::create_one_time_slot(
                &state.db_pool,
                slot_date,
                start_time,
                end_time,
            )
            .await
            .map_err(SlotError::Database)?;

            CreatedSlot::OneTime(slot.into())
        }
        ValidatedCreate::Recurring {
            day_of_week,
            start_time,
            end_time,
        } => {
            let slot = slotwise_db::repositories::recurring_slot::create_recurring_slot(
                &state.db_pool,
                day_of_week,
                start_time,
                end_time,
            )
            .await
            .map_err(SlotError::Database)?
            .ok_or_else(|| {
                SlotError::Capacity("Maximum 2 recurring slots allowed per day".to_string())
            })?;

            CreatedSlot::Recurring(slot.into())
        }
    };

    Ok((StatusCode::CREATED, Json(created)))
}

#[axum::debug_handler]
pub async fn get_week(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<SlotInstance>>, AppError> {
    let week_start = query.week_start.as_deref().ok_or_else(|| {
        SlotError::Validation("weekStart query parameter is required".to_string())
    })?;
    let week_start = parse_date(week_start)?;
    let week_end = week_start
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX);

    // Templates are loaded whole; exceptions and one-time slots only for the
    // requested window.
    let slots = slotwise_db::repositories::recurring_slot::get_all_recurring_slots(&state.db_pool)
        .await
        .map_err(SlotError::Database)?;
    let exceptions = slotwise_db::repositories::slot_exception::get_exceptions_in_range(
        &state.db_pool,
        week_start,
        week_end,
    )
    .await
    .map_err(SlotError::Database)?;
    let one_time_slots = slotwise_db::repositories::one_time_slot::get_one_time_slots_in_range(
        &state.db_pool,
        week_start,
        week_end,
    )
    .await
    .map_err(SlotError::Database)?;

    let slots: Vec<_> = slots.into_iter().map(Into::into).collect();
    let exceptions: Vec<_> = exceptions.into_iter().map(Into::into).collect();
    let one_time_slots: Vec<_> = one_time_slots.into_iter().map(Into::into).collect();

    let instances = expand_week(week_start, &slots, &exceptions, &one_time_slots);

    Ok(Json(instances))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| SlotError::Validation("date query parameter is required".to_string()))?;
    let date = parse_date(date)?;
    let (start_time, end_time) = require_times(&payload.start_time, &payload.end_time)?;

    // One-time slots are edited in place; the date is informational for them.
    let one_time =
        slotwise_db::repositories::one_time_slot::get_one_time_slot_by_id(&state.db_pool, slot_id)
            .await
            .map_err(SlotError::Database)?;
    if one_time.is_some() {
        slotwise_db::repositories::one_time_slot::update_one_time_slot(
            &state.db_pool,
            slot_id,
            start_time,
            end_time,
        )
        .await
        .map_err(SlotError::Database)?;

        return Ok(Json(MessageResponse {
            message: "Slot updated successfully".to_string(),
        }));
    }

    // A recurring slot is never edited directly: the change lands as a
    // modified exception for the requested date.
    let recurring = slotwise_db::repositories::recurring_slot::get_recurring_slot_by_id(
        &state.db_pool,
        slot_id,
    )
    .await
    .map_err(SlotError::Database)?;
    if recurring.is_some() {
        slotwise_db::repositories::slot_exception::upsert_exception(
            &state.db_pool,
            slot_id,
            date,
            Some(start_time),
            Some(end_time),
            ExceptionType::Modified,
        )
        .await
        .map_err(SlotError::Database)?;

        return Ok(Json(MessageResponse {
            message: "Slot updated successfully".to_string(),
        }));
    }

    Err(AppError(SlotError::NotFound(format!(
        "Slot with ID {slot_id} not found"
    ))))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| SlotError::Validation("date query parameter is required".to_string()))?;
    let date = parse_date(date)?;

    let one_time =
        slotwise_db::repositories::one_time_slot::get_one_time_slot_by_id(&state.db_pool, slot_id)
            .await
            .map_err(SlotError::Database)?;
    if one_time.is_some() {
        slotwise_db::repositories::one_time_slot::delete_one_time_slot(&state.db_pool, slot_id)
            .await
            .map_err(SlotError::Database)?;

        return Ok(Json(MessageResponse {
            message: "Slot deleted successfully".to_string(),
        }));
    }

    let recurring = slotwise_db::repositories::recurring_slot::get_recurring_slot_by_id(
        &state.db_pool,
        slot_id,
    )
    .await
    .map_err(SlotError::Database)?;
    if recurring.is_some() {
        // Cancelling one occurrence writes a deleted exception; a prior
        // modified exception for the date is replaced by it.
        slotwise_db::repositories::slot_exception::upsert_exception(
            &state.db_pool,
            slot_id,
            date,
            None,
            None,
            ExceptionType::Deleted,
        )
        .await
        .map_err(SlotError::Database)?;

        return Ok(Json(MessageResponse {
            message: "Slot deleted successfully".to_string(),
        }));
    }

    Err(AppError(SlotError::NotFound(format!(
        "Slot with ID {slot_id} not found"
    ))))
}

#[axum::debug_handler]
pub async fn delete_recurring_slot(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    slotwise_db::repositories::recurring_slot::delete_recurring_slot_with_exceptions(
        &state.db_pool,
        slot_id,
    )
    .await
    .map_err(SlotError::Database)?;

    Ok(Json(MessageResponse {
        message: "Recurring slot deleted successfully".to_string(),
    }))
}
