use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/slots", post(handlers::slots::create_slot))
        .route("/slots/week", get(handlers::slots::get_week))
        .route(
            "/slots/:slot_id",
            put(handlers::slots::update_slot).delete(handlers::slots::delete_slot),
        )
        .route(
            "/slots/:slot_id/recurring",
            delete(handlers::slots::delete_recurring_slot),
        )
}
