use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/time-slots/:id/materialize",
            post(handlers::sessions::materialize_time_slot),
        )
        .route(
            "/api/time-slots/:id/sessions",
            get(handlers::sessions::list_time_slot_sessions),
        )
        .route(
            "/api/time-slots/:id/preview",
            get(handlers::sessions::preview_time_slot),
        )
        .route(
            "/api/students/:id/sessions/generate",
            post(handlers::sessions::generate_student_sessions),
        )
}
