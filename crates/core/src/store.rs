//! Storage collaborators the engine reads from and writes to.
//!
//! Implementations live outside this crate (PostgreSQL in `classrota-db`) except
//! for [`InMemoryStore`](crate::memory::InMemoryStore).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    assignment::TutorAssignment,
    session::{Commitment, NewSession, Session},
};

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// ACCEPTED assignments attached to the slot.
    async fn accepted_assignments(&self, time_slot_id: Uuid) -> eyre::Result<Vec<TutorAssignment>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn session_exists(
        &self,
        time_slot_id: Uuid,
        scheduled_start: DateTime<Utc>,
    ) -> eyre::Result<bool>;

    /// Inserts the session unless one already exists for
    /// `(time_slot_id, scheduled_start)`.
    ///
    /// Must be atomic with respect to concurrent callers. Returns `None` when
    /// the key was already taken.
    async fn insert_if_absent(&self, session: &NewSession) -> eyre::Result<Option<Session>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// PENDING or CONFIRMED sessions and declared unavailability of the tutor
    /// that intersect `[window_start, window_end)`.
    async fn tutor_commitments(
        &self,
        tutor_id: Uuid,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> eyre::Result<Vec<Commitment>>;
}
