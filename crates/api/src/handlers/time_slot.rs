use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use classrota_core::{
    errors::RotaError,
    models::time_slot::{CreateTimeSlotRequest, TimeSlotTemplate},
};
use classrota_db::repositories::time_slot;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Loads a slot or fails with 404.
pub(crate) async fn load_time_slot(state: &ApiState, id: Uuid) -> Result<TimeSlotTemplate, AppError> {
    let row = time_slot::get_time_slot_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| RotaError::NotFound(format!("Time slot with ID {} not found", id)))?;

    Ok(TimeSlotTemplate::try_from(row)?)
}

#[axum::debug_handler]
pub async fn create_time_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<TimeSlotTemplate>), AppError> {
    let created_at = Utc::now();
    let epoch = payload.epoch_for(created_at)?;

    let row = time_slot::create_time_slot(&state.db_pool, &payload, epoch, created_at).await?;
    let slot = TimeSlotTemplate::try_from(row)?;
    info!(
        "Created time slot {} for class {} ({} {})",
        slot.id, slot.class_id, slot.subject, slot.timezone
    );

    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn get_time_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimeSlotTemplate>, AppError> {
    Ok(Json(load_time_slot(&state, id).await?))
}

#[axum::debug_handler]
pub async fn deactivate_time_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimeSlotTemplate>, AppError> {
    let row = time_slot::deactivate_time_slot(&state.db_pool, id)
        .await?
        .ok_or_else(|| RotaError::NotFound(format!("Time slot with ID {} not found", id)))?;
    info!("Deactivated time slot {}", id);

    Ok(Json(TimeSlotTemplate::try_from(row)?))
}
