pub mod one_time_slot;
pub mod recurring_slot;
pub mod slot_exception;
