use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/time-slots", post(handlers::time_slot::create_time_slot))
        .route("/api/time-slots/:id", get(handlers::time_slot::get_time_slot))
        .route(
            "/api/time-slots/:id/deactivate",
            post(handlers::time_slot::deactivate_time_slot),
        )
}
