use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Tutor directory, read-only for the engine
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutors (
            id UUID PRIMARY KEY,
            display_name VARCHAR(255) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS class_enrollments (
            class_id UUID NOT NULL,
            student_id UUID NOT NULL,
            PRIMARY KEY (class_id, student_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Weekly templates are deactivated, never deleted
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            class_id UUID NOT NULL,
            subject VARCHAR(255) NOT NULL,
            day_of_week SMALLINT NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            epoch_date DATE NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_assignments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            time_slot_id UUID NOT NULL REFERENCES time_slots(id),
            tutor_id UUID NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
            recurrence_pattern VARCHAR(32) NOT NULL,
            recurrence_config JSONB NOT NULL DEFAULT '{}'::jsonb,
            start_date DATE NOT NULL,
            end_date DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_assignment_status CHECK (status IN ('PENDING', 'ACCEPTED', 'DECLINED')),
            CONSTRAINT valid_recurrence_pattern CHECK (
                recurrence_pattern IN ('MANUAL', 'WEEKLY', 'CONSECUTIVE_DAYS', 'ROUND_ROBIN')
            ),
            CONSTRAINT valid_date_range CHECK (end_date IS NULL OR end_date >= start_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One session per slot occurrence; ad hoc sessions have no slot and are unconstrained
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            time_slot_id UUID NULL REFERENCES time_slots(id),
            class_id UUID NOT NULL,
            subject VARCHAR(255) NOT NULL,
            scheduled_start TIMESTAMP WITH TIME ZONE NOT NULL,
            scheduled_end TIMESTAMP WITH TIME ZONE NOT NULL,
            tutor_id UUID NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_session_range CHECK (scheduled_end > scheduled_start),
            CONSTRAINT valid_session_status CHECK (
                status IN ('PENDING', 'CONFIRMED', 'COMPLETED', 'CANCELLED')
            ),
            CONSTRAINT unique_slot_occurrence UNIQUE (time_slot_id, scheduled_start)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_unavailability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL,
            starts_at TIMESTAMP WITH TIME ZONE NOT NULL,
            ends_at TIMESTAMP WITH TIME ZONE NOT NULL,
            reason VARCHAR(255) NULL,
            CONSTRAINT valid_unavailability_range CHECK (ends_at > starts_at)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_time_slots_class_id ON time_slots(class_id)",
        "CREATE INDEX IF NOT EXISTS idx_class_enrollments_student_id ON class_enrollments(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_tutor_assignments_time_slot_id ON tutor_assignments(time_slot_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_tutor_id ON sessions(tutor_id, scheduled_start)",
        "CREATE INDEX IF NOT EXISTS idx_tutor_unavailability_tutor_id ON tutor_unavailability(tutor_id, starts_at)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
