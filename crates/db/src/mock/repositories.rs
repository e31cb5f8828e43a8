use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use slotwise_core::models::slot::ExceptionType;
use uuid::Uuid;

use crate::models::{DbOneTimeSlot, DbRecurringSlot, DbSlotException};

// Mock repositories for testing
mock! {
    pub RecurringSlotRepo {
        pub async fn create_recurring_slot(
            &self,
            day_of_week: i32,
            start_time: NaiveTime,
            end_time: NaiveTime,
        ) -> eyre::Result<Option<DbRecurringSlot>>;

        pub async fn get_recurring_slot_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbRecurringSlot>>;

        pub async fn get_all_recurring_slots(&self) -> eyre::Result<Vec<DbRecurringSlot>>;

        pub async fn delete_recurring_slot_with_exceptions(
            &self,
            id: Uuid,
        ) -> eyre::Result<()>;
    }
}

mock! {
    pub SlotExceptionRepo {
        pub async fn upsert_exception(
            &self,
            slot_id: Uuid,
            exception_date: NaiveDate,
            start_time: Option<NaiveTime>,
            end_time: Option<NaiveTime>,
            kind: ExceptionType,
        ) -> eyre::Result<DbSlotException>;

        pub async fn get_exceptions_in_range(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<DbSlotException>>;
    }
}

mock! {
    pub OneTimeSlotRepo {
        pub async fn create_one_time_slot(
            &self,
            slot_date: NaiveDate,
            start_time: NaiveTime,
            end_time: NaiveTime,
        ) -> eyre::Result<DbOneTimeSlot>;

        pub async fn get_one_time_slot_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbOneTimeSlot>>;

        pub async fn get_one_time_slots_in_range(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<DbOneTimeSlot>>;

        pub async fn update_one_time_slot(
            &self,
            id: Uuid,
            start_time: NaiveTime,
            end_time: NaiveTime,
        ) -> eyre::Result<()>;

        pub async fn delete_one_time_slot(&self, id: Uuid) -> eyre::Result<()>;
    }
}
