//! # Week Expansion Engine
//!
//! Reconstructs the effective slot instances for a 7-day window by merging
//! the weekly recurring templates with their sparse per-date exceptions and
//! the one-time slots that land inside the window.
//!
//! ## Algorithm
//!
//! For each of the 7 consecutive dates starting at the given week start:
//!
//! 1. Every recurring template whose `day_of_week` matches the date emits an
//!    instance, unless an exception exists for `(slot_id, date)`:
//!    - a `modified` exception substitutes its own times and marks the
//!      instance `is_exception`,
//!    - a `deleted` exception suppresses the occurrence entirely.
//! 2. Every one-time slot dated inside the window emits an instance with its
//!    day-of-week derived from `slot_date`.
//! 3. The full set is stable-sorted by `(date, start_time)`.
//!
//! The function is pure: deterministic for the same inputs, no side effects,
//! and safe to rerun at any time. Records dated outside the inclusive
//! `[week_start, week_start + 6]` window never produce instances, even when
//! the caller passes them in unfiltered.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use crate::models::{
    instance::SlotInstance,
    slot::{ExceptionType, OneTimeSlot, RecurringSlot, SlotException},
};

/// Day-of-week index for a date, 0=Sunday .. 6=Saturday.
pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// Expands the week starting at `week_start` into its effective instances.
///
/// `exceptions` and `one_time_slots` are expected to be pre-filtered to the
/// window by the caller's range queries; entries outside it are ignored here
/// regardless, so the window guarantee does not depend on the caller.
pub fn expand_week(
    week_start: NaiveDate,
    slots: &[RecurringSlot],
    exceptions: &[SlotException],
    one_time_slots: &[OneTimeSlot],
) -> Vec<SlotInstance> {
    let week_end = week_start
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX);

    // Unique constraint on (slot_id, exception_date) guarantees one entry
    // per key.
    let overrides: HashMap<(Uuid, NaiveDate), &SlotException> = exceptions
        .iter()
        .map(|ex| ((ex.slot_id, ex.exception_date), ex))
        .collect();

    let mut instances = Vec::new();

    for offset in 0..7 {
        let Some(date) = week_start.checked_add_days(Days::new(offset)) else {
            break;
        };
        let dow = day_of_week(date);

        for slot in slots.iter().filter(|slot| slot.day_of_week == dow) {
            match overrides.get(&(slot.id, date)) {
                Some(exception) => match exception.kind {
                    // A deleted occurrence emits nothing for this date.
                    ExceptionType::Deleted => {}
                    ExceptionType::Modified => {
                        // Modified rows always carry times; the template's
                        // own times are the fallback if one is absent.
                        instances.push(SlotInstance {
                            id: slot.id,
                            day_of_week: slot.day_of_week,
                            start_time: exception.start_time.unwrap_or(slot.start_time),
                            end_time: exception.end_time.unwrap_or(slot.end_time),
                            date,
                            created_at: slot.created_at,
                            updated_at: slot.updated_at,
                            is_exception: true,
                            is_recurring: true,
                        });
                    }
                },
                None => {
                    instances.push(SlotInstance {
                        id: slot.id,
                        day_of_week: slot.day_of_week,
                        start_time: slot.start_time,
                        end_time: slot.end_time,
                        date,
                        created_at: slot.created_at,
                        updated_at: slot.updated_at,
                        is_exception: false,
                        is_recurring: true,
                    });
                }
            }
        }
    }

    for one_time in one_time_slots
        .iter()
        .filter(|one_time| one_time.slot_date >= week_start && one_time.slot_date <= week_end)
    {
        instances.push(SlotInstance {
            id: one_time.id,
            day_of_week: day_of_week(one_time.slot_date),
            start_time: one_time.start_time,
            end_time: one_time.end_time,
            date: one_time.slot_date,
            created_at: one_time.created_at,
            updated_at: one_time.updated_at,
            is_exception: false,
            is_recurring: false,
        });
    }

    // Stable sort: instances sharing a date and start time keep their
    // relative emission order.
    instances.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.start_time.cmp(&b.start_time)));

    instances
}
