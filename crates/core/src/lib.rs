//! # Slotwise Core
//!
//! Domain models, error taxonomy, and the week expansion engine for the
//! slotwise scheduling service. This crate is free of database and HTTP
//! dependencies so the expansion logic can be exercised in isolation.

pub mod errors;
pub mod expansion;
pub mod models;
