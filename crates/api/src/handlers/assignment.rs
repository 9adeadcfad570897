use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use classrota_core::{
    errors::RotaError,
    models::assignment::{CreateAssignmentRequest, RespondAssignmentRequest, TutorAssignment},
};
use classrota_db::repositories::assignment;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, handlers::time_slot::load_time_slot, middleware::error_handling::AppError};

/// Invites a tutor onto a slot. The assignment starts PENDING.
#[axum::debug_handler]
pub async fn create_assignment(
    State(state): State<Arc<ApiState>>,
    Path(time_slot_id): Path<Uuid>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<TutorAssignment>), AppError> {
    let recurrence = payload.validate()?;

    let slot = load_time_slot(&state, time_slot_id).await?;
    if !slot.is_active {
        return Err(AppError(RotaError::Validation(format!(
            "Time slot {} is inactive",
            slot.id
        ))));
    }

    let row =
        assignment::create_assignment(&state.db_pool, slot.id, &payload, &recurrence).await?;
    let created = TutorAssignment::try_from(row)?;
    info!(
        "Invited tutor {} to slot {} as {}",
        created.tutor_id,
        slot.id,
        created.pattern()
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Accepts or declines a PENDING assignment.
#[axum::debug_handler]
pub async fn respond_to_assignment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondAssignmentRequest>,
) -> Result<Json<TutorAssignment>, AppError> {
    let current = assignment::get_assignment_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| RotaError::NotFound(format!("Assignment with ID {} not found", id)))?;
    let current = TutorAssignment::try_from(current)?;

    let target = current.status.transition(payload.target_status())?;

    // The row may have been answered since it was read
    let row = assignment::update_assignment_status(&state.db_pool, id, target)
        .await?
        .ok_or_else(|| {
            RotaError::InvalidTransition(format!("Assignment {} was already answered", id))
        })?;
    info!("Assignment {} is now {}", id, target);

    Ok(Json(TutorAssignment::try_from(row)?))
}

/// Removes an assignment. Sessions already materialized keep their tutor.
#[axum::debug_handler]
pub async fn delete_assignment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !assignment::delete_assignment(&state.db_pool, id).await? {
        return Err(AppError(RotaError::NotFound(format!(
            "Assignment with ID {} not found",
            id
        ))));
    }
    info!("Deleted assignment {}", id);

    Ok(StatusCode::NO_CONTENT)
}
