use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use classrota_core::{
    engine::{
        materializer::{MaterializeReport, SessionMaterializer},
        preview::{self, PreviewEntry},
    },
    models::{session::Session, time_slot::TimeSlotTemplate},
    store::AssignmentStore,
};
use classrota_db::{
    repositories::{session, time_slot, tutor},
    store::PgStore,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::{HorizonQuery, time_slot::load_time_slot},
    middleware::error_handling::AppError,
};

#[derive(Debug, Serialize)]
pub struct GenerateSessionsResponse {
    pub message: String,
    pub sessions_created: usize,
    pub classes_touched: usize,
}

#[axum::debug_handler]
pub async fn materialize_time_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<HorizonQuery>,
) -> Result<Json<MaterializeReport>, AppError> {
    let weeks_ahead = state.horizon.weeks_ahead(query.weeks_ahead)?;
    let slot = load_time_slot(&state, id).await?;

    let store = PgStore::new(state.db_pool.clone());
    let report = SessionMaterializer::new(&store, &store, &store)
        .materialize(&slot, weeks_ahead, Utc::now())
        .await?;

    Ok(Json(report))
}

/// Sessions already written for a slot, earliest first.
#[axum::debug_handler]
pub async fn list_time_slot_sessions(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Session>>, AppError> {
    let slot = load_time_slot(&state, id).await?;

    let sessions = session::get_sessions_by_time_slot(&state.db_pool, slot.id)
        .await?
        .into_iter()
        .map(Session::try_from)
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(Json(sessions))
}

#[axum::debug_handler]
pub async fn preview_time_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<HorizonQuery>,
) -> Result<Json<Vec<PreviewEntry>>, AppError> {
    let weeks_ahead = state.horizon.weeks_ahead(query.weeks_ahead)?;
    let slot = load_time_slot(&state, id).await?;

    let store = PgStore::new(state.db_pool.clone());
    let assignments = store.accepted_assignments(slot.id).await?;

    let mut tutor_ids: Vec<Uuid> = assignments.iter().map(|a| a.tutor_id).collect();
    tutor_ids.sort();
    tutor_ids.dedup();
    let names = tutor::get_tutor_names(&state.db_pool, &tutor_ids).await?;

    Ok(Json(preview::preview(
        &slot,
        &assignments,
        weeks_ahead,
        Utc::now(),
        &names,
    )))
}

/// Materializes every active slot of the classes a student attends.
#[axum::debug_handler]
pub async fn generate_student_sessions(
    State(state): State<Arc<ApiState>>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<HorizonQuery>,
) -> Result<Json<GenerateSessionsResponse>, AppError> {
    let weeks_ahead = state.horizon.weeks_ahead(query.weeks_ahead)?;

    let slots = time_slot::get_active_time_slots_for_student(&state.db_pool, student_id)
        .await?
        .into_iter()
        .map(TimeSlotTemplate::try_from)
        .collect::<eyre::Result<Vec<_>>>()?;

    let store = PgStore::new(state.db_pool.clone());
    let batch = SessionMaterializer::new(&store, &store, &store)
        .materialize_many(&slots, weeks_ahead, Utc::now())
        .await?;
    info!("Student {}: {}", student_id, batch.summary());

    Ok(Json(GenerateSessionsResponse {
        message: batch.summary(),
        sessions_created: batch.sessions_created,
        classes_touched: batch.classes_touched,
    }))
}
