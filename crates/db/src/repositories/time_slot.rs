use crate::models::DbTimeSlot;
use chrono::{DateTime, NaiveDate, Utc};
use classrota_core::models::time_slot::CreateTimeSlotRequest;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const TIME_SLOT_COLUMNS: &str = "id, class_id, subject, day_of_week, start_time, end_time, \
     timezone, epoch_date, is_active, created_at";

pub async fn create_time_slot(
    pool: &Pool<Postgres>,
    request: &CreateTimeSlotRequest,
    epoch_date: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        INSERT INTO time_slots (id, class_id, subject, day_of_week, start_time, end_time,
                                timezone, epoch_date, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)
        RETURNING {TIME_SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(request.class_id)
    .bind(&request.subject)
    .bind(i16::from(request.day_of_week))
    .bind(request.start_time)
    .bind(request.end_time)
    .bind(&request.timezone)
    .bind(epoch_date)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {TIME_SLOT_COLUMNS}
        FROM time_slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Deactivates a slot. Sessions it already produced are left untouched.
pub async fn deactivate_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET is_active = FALSE
        WHERE id = $1
        RETURNING {TIME_SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_active_time_slots(pool: &Pool<Postgres>) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {TIME_SLOT_COLUMNS}
        FROM time_slots
        WHERE is_active
        ORDER BY class_id, day_of_week, start_time
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

/// Active slots of every class the student is enrolled in.
pub async fn get_active_time_slots_for_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT ts.id, ts.class_id, ts.subject, ts.day_of_week, ts.start_time, ts.end_time,
               ts.timezone, ts.epoch_date, ts.is_active, ts.created_at
        FROM time_slots ts
        JOIN class_enrollments ce ON ce.class_id = ts.class_id
        WHERE ce.student_id = $1 AND ts.is_active
        ORDER BY ts.class_id, ts.day_of_week, ts.start_time
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}
