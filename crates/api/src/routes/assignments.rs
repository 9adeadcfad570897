use axum::{
    Router,
    routing::{delete, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/time-slots/:id/assignments",
            post(handlers::assignment::create_assignment),
        )
        .route(
            "/api/assignments/:id/respond",
            post(handlers::assignment::respond_to_assignment),
        )
        .route(
            "/api/assignments/:id",
            delete(handlers::assignment::delete_assignment),
        )
}
