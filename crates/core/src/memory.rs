//! In-process implementation of the storage collaborators.
//!
//! Used by tests and by dry runs that should never touch the database. The
//! unique `(time_slot_id, scheduled_start)` key is enforced under one write
//! lock, which gives the same insert-or-skip contract as the SQL constraint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    engine::conflict::overlaps,
    models::{
        assignment::{AssignmentStatus, TutorAssignment},
        session::{Commitment, CommitmentKind, NewSession, Session},
    },
    store::{AssignmentStore, BookingStore, SessionStore},
};

#[derive(Debug, Default)]
struct Inner {
    assignments: Vec<TutorAssignment>,
    sessions: Vec<Session>,
    unavailability: Vec<Commitment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<TutorAssignment>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                assignments,
                ..Inner::default()
            }),
        }
    }

    pub async fn add_assignment(&self, assignment: TutorAssignment) {
        self.inner.write().await.assignments.push(assignment);
    }

    /// Removes an assignment; sessions already written keep their tutor.
    pub async fn remove_assignment(&self, assignment_id: Uuid) {
        self.inner
            .write()
            .await
            .assignments
            .retain(|a| a.id != assignment_id);
    }

    /// Seeds a session as if another workflow had booked it.
    pub async fn add_session(&self, session: Session) {
        self.inner.write().await.sessions.push(session);
    }

    pub async fn add_unavailability(
        &self,
        tutor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        self.inner.write().await.unavailability.push(Commitment {
            tutor_id,
            session_id: None,
            start,
            end,
            kind: CommitmentKind::Unavailability,
        });
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.inner.read().await.sessions.clone()
    }

    pub async fn sessions_for_slot(&self, time_slot_id: Uuid) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .inner
            .read()
            .await
            .sessions
            .iter()
            .filter(|s| s.time_slot_id == Some(time_slot_id))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.scheduled_start);
        sessions
    }
}

#[async_trait]
impl AssignmentStore for InMemoryStore {
    async fn accepted_assignments(&self, time_slot_id: Uuid) -> eyre::Result<Vec<TutorAssignment>> {
        Ok(self
            .inner
            .read()
            .await
            .assignments
            .iter()
            .filter(|a| a.time_slot_id == time_slot_id && a.status == AssignmentStatus::Accepted)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn session_exists(
        &self,
        time_slot_id: Uuid,
        scheduled_start: DateTime<Utc>,
    ) -> eyre::Result<bool> {
        Ok(self.inner.read().await.sessions.iter().any(|s| {
            s.time_slot_id == Some(time_slot_id) && s.scheduled_start == scheduled_start
        }))
    }

    async fn insert_if_absent(&self, session: &NewSession) -> eyre::Result<Option<Session>> {
        let mut inner = self.inner.write().await;

        let taken = inner.sessions.iter().any(|s| {
            s.time_slot_id == Some(session.time_slot_id)
                && s.scheduled_start == session.scheduled_start
        });
        if taken {
            return Ok(None);
        }

        let created = Session {
            id: Uuid::new_v4(),
            time_slot_id: Some(session.time_slot_id),
            class_id: session.class_id,
            subject: session.subject.clone(),
            scheduled_start: session.scheduled_start,
            scheduled_end: session.scheduled_end,
            tutor_id: session.tutor_id,
            status: session.status,
        };
        inner.sessions.push(created.clone());

        Ok(Some(created))
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn tutor_commitments(
        &self,
        tutor_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> eyre::Result<Vec<Commitment>> {
        let inner = self.inner.read().await;

        let sessions = inner
            .sessions
            .iter()
            .filter(|s| s.tutor_id == Some(tutor_id) && s.status.is_commitment())
            .map(|s| Commitment {
                tutor_id,
                session_id: Some(s.id),
                start: s.scheduled_start,
                end: s.scheduled_end,
                kind: CommitmentKind::Session,
            });

        let blocks = inner
            .unavailability
            .iter()
            .filter(|c| c.tutor_id == tutor_id)
            .cloned();

        Ok(sessions
            .chain(blocks)
            .filter(|c| overlaps(c.start, c.end, window_start, window_end))
            .collect())
    }
}
