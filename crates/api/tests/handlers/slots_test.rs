use chrono::{Local, NaiveDate, NaiveTime};
use mockall::{predicate, Sequence};
use pretty_assertions::assert_eq;
use slotwise_api::handlers::slots::{
    parse_date, validate_create_request, ValidatedCreate,
};
use slotwise_api::middleware::error_handling::AppError;
use slotwise_core::errors::SlotError;
use slotwise_core::models::slot::{
    CreateSlotRequest, CreatedSlot, ExceptionType, MessageResponse,
};
use uuid::Uuid;

use crate::test_utils::{date, exception_row, one_time_row, recurring_row, time, TestContext};

fn create_request(
    day_of_week: Option<i32>,
    start_time: Option<&str>,
    end_time: Option<&str>,
    is_recurring: Option<bool>,
    selected_date: Option<NaiveDate>,
) -> CreateSlotRequest {
    CreateSlotRequest {
        day_of_week,
        start_time: start_time.map(str::to_string),
        end_time: end_time.map(str::to_string),
        is_recurring,
        selected_date,
    }
}

// Test wrappers that run the handlers' dispatch logic against the mock
// repositories instead of a live database.

async fn test_create_slot_wrapper(
    ctx: &TestContext,
    validated: ValidatedCreate,
) -> Result<CreatedSlot, AppError> {
    match validated {
        ValidatedCreate::OneTime {
            slot_date,
            start_time,
            end_time,
        } => {
            let row = ctx
                .one_time_repo
                .create_one_time_slot(slot_date, start_time, end_time)
                .await?;
            Ok(CreatedSlot::OneTime(row.into()))
        }
        ValidatedCreate::Recurring {
            day_of_week,
            start_time,
            end_time,
        } => {
            let row = ctx
                .recurring_repo
                .create_recurring_slot(day_of_week, start_time, end_time)
                .await?
                .ok_or_else(|| {
                    AppError(SlotError::Capacity(
                        "Maximum 2 recurring slots allowed per day".to_string(),
                    ))
                })?;
            Ok(CreatedSlot::Recurring(row.into()))
        }
    }
}

async fn test_update_slot_wrapper(
    ctx: &TestContext,
    slot_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<MessageResponse, AppError> {
    if ctx
        .one_time_repo
        .get_one_time_slot_by_id(slot_id)
        .await?
        .is_some()
    {
        ctx.one_time_repo
            .update_one_time_slot(slot_id, start_time, end_time)
            .await?;
        return Ok(MessageResponse {
            message: "Slot updated successfully".to_string(),
        });
    }

    if ctx
        .recurring_repo
        .get_recurring_slot_by_id(slot_id)
        .await?
        .is_some()
    {
        ctx.exception_repo
            .upsert_exception(
                slot_id,
                date,
                Some(start_time),
                Some(end_time),
                ExceptionType::Modified,
            )
            .await?;
        return Ok(MessageResponse {
            message: "Slot updated successfully".to_string(),
        });
    }

    Err(AppError(SlotError::NotFound(format!(
        "Slot with ID {slot_id} not found"
    ))))
}

async fn test_delete_slot_wrapper(
    ctx: &TestContext,
    slot_id: Uuid,
    date: NaiveDate,
) -> Result<MessageResponse, AppError> {
    if ctx
        .one_time_repo
        .get_one_time_slot_by_id(slot_id)
        .await?
        .is_some()
    {
        ctx.one_time_repo.delete_one_time_slot(slot_id).await?;
        return Ok(MessageResponse {
            message: "Slot deleted successfully".to_string(),
        });
    }

    if ctx
        .recurring_repo
        .get_recurring_slot_by_id(slot_id)
        .await?
        .is_some()
    {
        ctx.exception_repo
            .upsert_exception(slot_id, date, None, None, ExceptionType::Deleted)
            .await?;
        return Ok(MessageResponse {
            message: "Slot deleted successfully".to_string(),
        });
    }

    Err(AppError(SlotError::NotFound(format!(
        "Slot with ID {slot_id} not found"
    ))))
}

#[test]
fn test_validate_create_defaults_to_recurring() {
    let request = create_request(Some(1), Some("09:00"), Some("17:00"), None, None);

    let validated = validate_create_request(&request).expect("request should validate");
    assert_eq!(
        validated,
        ValidatedCreate::Recurring {
            day_of_week: 1,
            start_time: time("09:00"),
            end_time: time("17:00"),
        }
    );
}

#[test]
fn test_validate_create_rejects_missing_times() {
    let request = create_request(Some(1), None, Some("17:00"), None, None);

    let err = validate_create_request(&request).unwrap_err();
    assert!(matches!(err, SlotError::Validation(_)));
    assert!(err.to_string().contains("start_time and end_time"));
}

#[test]
fn test_validate_create_rejects_day_out_of_range() {
    for day in [Some(-1), Some(7), None] {
        let request = create_request(day, Some("09:00"), Some("17:00"), None, None);
        let err = validate_create_request(&request).unwrap_err();
        assert!(err.to_string().contains("day_of_week"));
    }
}

#[test]
fn test_one_time_create_rejects_day_out_of_range() {
    // The range check applies before the one-time branch, so a stray
    // day_of_week cannot ride along on a non-recurring create.
    let request = create_request(
        Some(9),
        Some("11:00"),
        Some("12:00"),
        Some(false),
        Some(date("2024-01-04")),
    );

    let err = validate_create_request(&request).unwrap_err();
    assert!(matches!(err, SlotError::Validation(_)));
    assert!(err.to_string().contains("day_of_week"));
}

#[test]
fn test_validate_create_one_time_with_selected_date() {
    let request = create_request(
        None,
        Some("11:00"),
        Some("12:00"),
        Some(false),
        Some(date("2024-01-04")),
    );

    let validated = validate_create_request(&request).expect("request should validate");
    assert_eq!(
        validated,
        ValidatedCreate::OneTime {
            slot_date: date("2024-01-04"),
            start_time: time("11:00"),
            end_time: time("12:00"),
        }
    );
}

#[test]
fn test_validate_create_one_time_defaults_to_today() {
    let request = create_request(None, Some("11:00"), Some("12:00"), Some(false), None);

    let validated = validate_create_request(&request).expect("request should validate");
    match validated {
        ValidatedCreate::OneTime { slot_date, .. } => {
            assert_eq!(slot_date, Local::now().date_naive());
        }
        other => panic!("expected one-time slot, got {other:?}"),
    }
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2024-01-01").unwrap(), date("2024-01-01"));
    assert!(parse_date("01/01/2024").is_err());
    assert!(parse_date("not-a-date").is_err());
}

#[tokio::test]
async fn test_create_recurring_slot_succeeds() {
    let mut ctx = TestContext::new();
    let row = recurring_row(Uuid::new_v4(), 1, "09:00", "17:00");
    let returned = row.clone();

    ctx.recurring_repo
        .expect_create_recurring_slot()
        .with(
            predicate::eq(1),
            predicate::eq(time("09:00")),
            predicate::eq(time("17:00")),
        )
        .times(1)
        .returning(move |_, _, _| Ok(Some(returned.clone())));

    let created = test_create_slot_wrapper(
        &ctx,
        ValidatedCreate::Recurring {
            day_of_week: 1,
            start_time: time("09:00"),
            end_time: time("17:00"),
        },
    )
    .await
    .expect("creation should succeed");

    match created {
        CreatedSlot::Recurring(slot) => {
            assert_eq!(slot.id, row.id);
            assert_eq!(slot.day_of_week, 1);
        }
        CreatedSlot::OneTime(_) => panic!("expected recurring slot"),
    }
}

#[tokio::test]
async fn test_create_third_recurring_slot_hits_capacity() {
    let mut ctx = TestContext::new();

    // The repository reports the day as full by returning no row.
    ctx.recurring_repo
        .expect_create_recurring_slot()
        .times(1)
        .returning(|_, _, _| Ok(None));

    let err = test_create_slot_wrapper(
        &ctx,
        ValidatedCreate::Recurring {
            day_of_week: 1,
            start_time: time("09:00"),
            end_time: time("17:00"),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err.0, SlotError::Capacity(_)));
    assert!(err.0.to_string().contains("Maximum 2 recurring slots"));
}

#[tokio::test]
async fn test_create_one_time_slot_skips_capacity_check() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let row = one_time_row(id, date("2024-01-04"), "11:00", "12:00");

    ctx.one_time_repo
        .expect_create_one_time_slot()
        .with(
            predicate::eq(date("2024-01-04")),
            predicate::eq(time("11:00")),
            predicate::eq(time("12:00")),
        )
        .times(1)
        .returning(move |_, _, _| Ok(row.clone()));

    let created = test_create_slot_wrapper(
        &ctx,
        ValidatedCreate::OneTime {
            slot_date: date("2024-01-04"),
            start_time: time("11:00"),
            end_time: time("12:00"),
        },
    )
    .await
    .expect("creation should succeed");

    match created {
        CreatedSlot::OneTime(slot) => assert_eq!(slot.id, id),
        CreatedSlot::Recurring(_) => panic!("expected one-time slot"),
    }
}

#[tokio::test]
async fn test_update_resolves_one_time_slot_first() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let row = one_time_row(id, date("2024-01-04"), "11:00", "12:00");

    ctx.one_time_repo
        .expect_get_one_time_slot_by_id()
        .with(predicate::eq(id))
        .times(1)
        .returning(move |_| Ok(Some(row.clone())));
    ctx.one_time_repo
        .expect_update_one_time_slot()
        .with(
            predicate::eq(id),
            predicate::eq(time("13:00")),
            predicate::eq(time("14:00")),
        )
        .times(1)
        .returning(|_, _, _| Ok(()));
    // The recurring table must not be consulted when the one-time lookup hits.
    ctx.recurring_repo.expect_get_recurring_slot_by_id().times(0);

    let response =
        test_update_slot_wrapper(&ctx, id, date("2024-01-04"), time("13:00"), time("14:00"))
            .await
            .expect("update should succeed");
    assert_eq!(response.message, "Slot updated successfully");
}

#[tokio::test]
async fn test_update_recurring_slot_upserts_modified_exception() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let row = recurring_row(id, 1, "09:00", "17:00");

    ctx.one_time_repo
        .expect_get_one_time_slot_by_id()
        .times(1)
        .returning(|_| Ok(None));
    ctx.recurring_repo
        .expect_get_recurring_slot_by_id()
        .with(predicate::eq(id))
        .times(1)
        .returning(move |_| Ok(Some(row.clone())));
    ctx.exception_repo
        .expect_upsert_exception()
        .with(
            predicate::eq(id),
            predicate::eq(date("2024-01-01")),
            predicate::eq(Some(time("10:00"))),
            predicate::eq(Some(time("14:00"))),
            predicate::eq(ExceptionType::Modified),
        )
        .times(1)
        .returning(|slot_id, on, start, end, _| {
            Ok(exception_row(slot_id, on, start, end, "modified"))
        });

    let response =
        test_update_slot_wrapper(&ctx, id, date("2024-01-01"), time("10:00"), time("14:00"))
            .await
            .expect("update should succeed");
    assert_eq!(response.message, "Slot updated successfully");
}

#[tokio::test]
async fn test_update_unknown_slot_is_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.one_time_repo
        .expect_get_one_time_slot_by_id()
        .times(1)
        .returning(|_| Ok(None));
    ctx.recurring_repo
        .expect_get_recurring_slot_by_id()
        .times(1)
        .returning(|_| Ok(None));

    let err = test_update_slot_wrapper(&ctx, id, date("2024-01-01"), time("10:00"), time("14:00"))
        .await
        .unwrap_err();
    assert!(matches!(err.0, SlotError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_one_time_slot_removes_row() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let row = one_time_row(id, date("2024-01-04"), "11:00", "12:00");

    ctx.one_time_repo
        .expect_get_one_time_slot_by_id()
        .times(1)
        .returning(move |_| Ok(Some(row.clone())));
    ctx.one_time_repo
        .expect_delete_one_time_slot()
        .with(predicate::eq(id))
        .times(1)
        .returning(|_| Ok(()));
    // A one-time slot is hard-deleted; no exception is written.
    ctx.exception_repo.expect_upsert_exception().times(0);

    let response = test_delete_slot_wrapper(&ctx, id, date("2024-01-04"))
        .await
        .expect("delete should succeed");
    assert_eq!(response.message, "Slot deleted successfully");
}

#[tokio::test]
async fn test_delete_recurring_occurrence_upserts_deleted_exception() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let row = recurring_row(id, 1, "09:00", "17:00");

    ctx.one_time_repo
        .expect_get_one_time_slot_by_id()
        .times(1)
        .returning(|_| Ok(None));
    ctx.recurring_repo
        .expect_get_recurring_slot_by_id()
        .times(1)
        .returning(move |_| Ok(Some(row.clone())));
    ctx.exception_repo
        .expect_upsert_exception()
        .with(
            predicate::eq(id),
            predicate::eq(date("2024-01-01")),
            predicate::eq(None::<NaiveTime>),
            predicate::eq(None::<NaiveTime>),
            predicate::eq(ExceptionType::Deleted),
        )
        .times(1)
        .returning(|slot_id, on, _, _, _| Ok(exception_row(slot_id, on, None, None, "deleted")));

    let response = test_delete_slot_wrapper(&ctx, id, date("2024-01-01"))
        .await
        .expect("delete should succeed");
    assert_eq!(response.message, "Slot deleted successfully");
}

#[tokio::test]
async fn test_modify_then_delete_replaces_exception_at_same_key() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let row = recurring_row(id, 1, "09:00", "17:00");
    let row_for_update = row.clone();
    let mut seq = Sequence::new();

    ctx.one_time_repo
        .expect_get_one_time_slot_by_id()
        .times(2)
        .returning(|_| Ok(None));
    ctx.recurring_repo
        .expect_get_recurring_slot_by_id()
        .times(2)
        .returning(move |_| Ok(Some(row_for_update.clone())));

    // Both writes target the same (slot_id, date) key; the second replaces
    // the first at the store's unique constraint.
    ctx.exception_repo
        .expect_upsert_exception()
        .with(
            predicate::eq(id),
            predicate::eq(date("2024-01-01")),
            predicate::always(),
            predicate::always(),
            predicate::eq(ExceptionType::Modified),
        )
        .times(1)
        .in_sequence(&mut seq)
        .returning(|slot_id, on, start, end, _| {
            Ok(exception_row(slot_id, on, start, end, "modified"))
        });
    ctx.exception_repo
        .expect_upsert_exception()
        .with(
            predicate::eq(id),
            predicate::eq(date("2024-01-01")),
            predicate::always(),
            predicate::always(),
            predicate::eq(ExceptionType::Deleted),
        )
        .times(1)
        .in_sequence(&mut seq)
        .returning(|slot_id, on, _, _, _| Ok(exception_row(slot_id, on, None, None, "deleted")));

    test_update_slot_wrapper(&ctx, id, date("2024-01-01"), time("10:00"), time("14:00"))
        .await
        .expect("update should succeed");
    test_delete_slot_wrapper(&ctx, id, date("2024-01-01"))
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn test_delete_recurring_slot_removes_template_and_exceptions() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.recurring_repo
        .expect_delete_recurring_slot_with_exceptions()
        .with(predicate::eq(id))
        .times(1)
        .returning(|_| Ok(()));

    ctx.recurring_repo
        .delete_recurring_slot_with_exceptions(id)
        .await
        .expect("delete should succeed");
}
