//! PostgreSQL implementation of the engine's storage collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classrota_core::{
    models::{
        assignment::TutorAssignment,
        session::{Commitment, NewSession, Session},
    },
    store::{AssignmentStore, BookingStore, SessionStore},
};
use eyre::Result;
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{assignment, session},
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for PgStore {
    async fn accepted_assignments(&self, time_slot_id: Uuid) -> Result<Vec<TutorAssignment>> {
        assignment::get_accepted_assignments_by_time_slot(&self.pool, time_slot_id)
            .await?
            .into_iter()
            .map(TutorAssignment::try_from)
            .collect()
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn session_exists(
        &self,
        time_slot_id: Uuid,
        scheduled_start: DateTime<Utc>,
    ) -> Result<bool> {
        session::session_exists(&self.pool, time_slot_id, scheduled_start).await
    }

    async fn insert_if_absent(&self, new_session: &NewSession) -> Result<Option<Session>> {
        session::insert_session_if_absent(&self.pool, new_session)
            .await?
            .map(Session::try_from)
            .transpose()
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn tutor_commitments(
        &self,
        tutor_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Commitment>> {
        session::get_tutor_commitments(&self.pool, tutor_id, window_start, window_end)
            .await?
            .into_iter()
            .map(Commitment::try_from)
            .collect()
    }
}
