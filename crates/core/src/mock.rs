use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::{
    models::{
        assignment::TutorAssignment,
        session::{Commitment, NewSession, Session},
    },
    store,
};

// Mock collaborators for testing
mock! {
    pub Assignments {}

    #[async_trait]
    impl store::AssignmentStore for Assignments {
        async fn accepted_assignments(
            &self,
            time_slot_id: Uuid,
        ) -> eyre::Result<Vec<TutorAssignment>>;
    }
}

mock! {
    pub Sessions {}

    #[async_trait]
    impl store::SessionStore for Sessions {
        async fn session_exists(
            &self,
            time_slot_id: Uuid,
            scheduled_start: DateTime<Utc>,
        ) -> eyre::Result<bool>;

        async fn insert_if_absent(
            &self,
            session: &NewSession,
        ) -> eyre::Result<Option<Session>>;
    }
}

mock! {
    pub Bookings {}

    #[async_trait]
    impl store::BookingStore for Bookings {
        async fn tutor_commitments(
            &self,
            tutor_id: Uuid,
            window_start: DateTime<Utc>,
            window_end: DateTime<Utc>,
        ) -> eyre::Result<Vec<Commitment>>;
    }
}
