use crate::models::{DbCommitment, DbSession};
use chrono::{DateTime, Utc};
use classrota_core::models::session::NewSession;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SESSION_COLUMNS: &str =
    "id, time_slot_id, class_id, subject, scheduled_start, scheduled_end, tutor_id, status";

/// Inserts a slot occurrence unless `(time_slot_id, scheduled_start)` is taken.
///
/// The unique constraint decides between concurrent writers; the loser gets
/// `None` back instead of an error.
pub async fn insert_session_if_absent(
    pool: &Pool<Postgres>,
    session: &NewSession,
) -> Result<Option<DbSession>> {
    let id = Uuid::new_v4();

    let inserted = sqlx::query_as::<_, DbSession>(&format!(
        r#"
        INSERT INTO sessions (id, time_slot_id, class_id, subject, scheduled_start,
                              scheduled_end, tutor_id, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (time_slot_id, scheduled_start) DO NOTHING
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(session.time_slot_id)
    .bind(session.class_id)
    .bind(&session.subject)
    .bind(session.scheduled_start)
    .bind(session.scheduled_end)
    .bind(session.tutor_id)
    .bind(session.status.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(inserted)
}

pub async fn session_exists(
    pool: &Pool<Postgres>,
    time_slot_id: Uuid,
    scheduled_start: DateTime<Utc>,
) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM sessions
            WHERE time_slot_id = $1 AND scheduled_start = $2
        )
        "#,
    )
    .bind(time_slot_id)
    .bind(scheduled_start)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn get_sessions_by_time_slot(
    pool: &Pool<Postgres>,
    time_slot_id: Uuid,
) -> Result<Vec<DbSession>> {
    let sessions = sqlx::query_as::<_, DbSession>(&format!(
        r#"
        SELECT {SESSION_COLUMNS}
        FROM sessions
        WHERE time_slot_id = $1
        ORDER BY scheduled_start ASC
        "#
    ))
    .bind(time_slot_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Live sessions and unavailability of a tutor intersecting `[window_start, window_end)`.
pub async fn get_tutor_commitments(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<DbCommitment>> {
    let commitments = sqlx::query_as::<_, DbCommitment>(
        r#"
        SELECT tutor_id, id AS session_id, scheduled_start AS starts_at,
               scheduled_end AS ends_at, 'session' AS kind
        FROM sessions
        WHERE tutor_id = $1
          AND status IN ('PENDING', 'CONFIRMED')
          AND scheduled_start < $3
          AND scheduled_end > $2
        UNION ALL
        SELECT tutor_id, NULL::uuid AS session_id, starts_at, ends_at, 'unavailability' AS kind
        FROM tutor_unavailability
        WHERE tutor_id = $1
          AND starts_at < $3
          AND ends_at > $2
        ORDER BY starts_at ASC
        "#,
    )
    .bind(tutor_id)
    .bind(window_start)
    .bind(window_end)
    .fetch_all(pool)
    .await?;

    Ok(commitments)
}
