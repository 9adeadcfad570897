use crate::models::DbTutorAssignment;
use chrono::Utc;
use classrota_core::models::{
    assignment::{AssignmentStatus, CreateAssignmentRequest},
    recurrence::RecurrenceConfig,
};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const ASSIGNMENT_COLUMNS: &str = "id, time_slot_id, tutor_id, status, recurrence_pattern, \
     recurrence_config, start_date, end_date, created_at";

/// Proposes a tutor for a slot. New assignments start PENDING.
pub async fn create_assignment(
    pool: &Pool<Postgres>,
    time_slot_id: Uuid,
    request: &CreateAssignmentRequest,
    recurrence: &RecurrenceConfig,
) -> Result<DbTutorAssignment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let assignment = sqlx::query_as::<_, DbTutorAssignment>(&format!(
        r#"
        INSERT INTO tutor_assignments (id, time_slot_id, tutor_id, status, recurrence_pattern,
                                       recurrence_config, start_date, end_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(time_slot_id)
    .bind(request.tutor_id)
    .bind(AssignmentStatus::Pending.as_str())
    .bind(recurrence.pattern().as_str())
    .bind(recurrence.config_json())
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(assignment)
}

pub async fn get_assignment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbTutorAssignment>> {
    let assignment = sqlx::query_as::<_, DbTutorAssignment>(&format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM tutor_assignments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(assignment)
}

/// Moves a PENDING assignment to `status`.
///
/// Returns `None` when the row is missing or no longer PENDING, so two
/// concurrent responses cannot both succeed.
pub async fn update_assignment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AssignmentStatus,
) -> Result<Option<DbTutorAssignment>> {
    let assignment = sqlx::query_as::<_, DbTutorAssignment>(&format!(
        r#"
        UPDATE tutor_assignments
        SET status = $2
        WHERE id = $1 AND status = 'PENDING'
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(assignment)
}

/// Removes an assignment. Returns whether a row was deleted.
pub async fn delete_assignment(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM tutor_assignments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_accepted_assignments_by_time_slot(
    pool: &Pool<Postgres>,
    time_slot_id: Uuid,
) -> Result<Vec<DbTutorAssignment>> {
    let assignments = sqlx::query_as::<_, DbTutorAssignment>(&format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM tutor_assignments
        WHERE time_slot_id = $1 AND status = 'ACCEPTED'
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(time_slot_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}
