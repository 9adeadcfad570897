use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use classrota_core::models::{
    assignment::TutorAssignment,
    recurrence::{RecurrenceConfig, RecurrencePattern},
    session::{Commitment, CommitmentKind, Session},
    time_slot::TimeSlotTemplate,
};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub class_id: Uuid,
    pub subject: String,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub timezone: String,
    pub epoch_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTutorAssignment {
    pub id: Uuid,
    pub time_slot_id: Uuid,
    pub tutor_id: Uuid,
    pub status: String,
    pub recurrence_pattern: String,
    pub recurrence_config: serde_json::Value,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub id: Uuid,
    pub time_slot_id: Option<Uuid>,
    pub class_id: Uuid,
    pub subject: String,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub tutor_id: Option<Uuid>,
    pub status: String,
}

/// Row of the union of a tutor's live sessions and unavailability blocks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCommitment {
    pub tutor_id: Uuid,
    pub session_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTutor {
    pub id: Uuid,
    pub display_name: String,
}

impl TryFrom<DbTimeSlot> for TimeSlotTemplate {
    type Error = eyre::Report;

    fn try_from(row: DbTimeSlot) -> Result<Self> {
        let day_of_week = u8::try_from(row.day_of_week)
            .map_err(|_| eyre!("time slot {} has day_of_week {}", row.id, row.day_of_week))?;
        row.timezone
            .parse::<Tz>()
            .map_err(|_| eyre!("time slot {} has unknown timezone {}", row.id, row.timezone))?;

        Ok(TimeSlotTemplate {
            id: row.id,
            class_id: row.class_id,
            subject: row.subject,
            day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            timezone: row.timezone,
            epoch: row.epoch_date,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbTutorAssignment> for TutorAssignment {
    type Error = eyre::Report;

    fn try_from(row: DbTutorAssignment) -> Result<Self> {
        let pattern: RecurrencePattern = row.recurrence_pattern.parse()?;
        let recurrence = RecurrenceConfig::from_parts(pattern, &row.recurrence_config)?;

        Ok(TutorAssignment {
            id: row.id,
            time_slot_id: row.time_slot_id,
            tutor_id: row.tutor_id,
            status: row.status.parse()?,
            recurrence,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbSession> for Session {
    type Error = eyre::Report;

    fn try_from(row: DbSession) -> Result<Self> {
        Ok(Session {
            id: row.id,
            time_slot_id: row.time_slot_id,
            class_id: row.class_id,
            subject: row.subject,
            scheduled_start: row.scheduled_start,
            scheduled_end: row.scheduled_end,
            tutor_id: row.tutor_id,
            status: row.status.parse()?,
        })
    }
}

impl TryFrom<DbCommitment> for Commitment {
    type Error = eyre::Report;

    fn try_from(row: DbCommitment) -> Result<Self> {
        let kind = match row.kind.as_str() {
            "session" => CommitmentKind::Session,
            "unavailability" => CommitmentKind::Unavailability,
            other => return Err(eyre!("unknown commitment kind {}", other)),
        };

        Ok(Commitment {
            tutor_id: row.tutor_id,
            session_id: row.session_id,
            start: row.starts_at,
            end: row.ends_at,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use classrota_core::models::{
        assignment::AssignmentStatus, session::SessionStatus,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn assignment_row(pattern: &str, config: serde_json::Value, status: &str) -> DbTutorAssignment {
        DbTutorAssignment {
            id: Uuid::new_v4(),
            time_slot_id: Uuid::new_v4(),
            tutor_id: Uuid::new_v4(),
            status: status.to_string(),
            recurrence_pattern: pattern.to_string(),
            recurrence_config: config,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            end_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn time_slot_row_converts() {
        let row = DbTimeSlot {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            subject: "Histoire".to_string(),
            day_of_week: 5,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            timezone: "Europe/Paris".to_string(),
            epoch_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap(),
        };

        let slot = TimeSlotTemplate::try_from(row.clone()).unwrap();
        assert_eq!(slot.day_of_week, 5);
        assert_eq!(slot.epoch, row.epoch_date);
        assert_eq!(slot.subject, "Histoire");
    }

    #[test]
    fn negative_day_of_week_is_rejected() {
        let row = DbTimeSlot {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            subject: "Histoire".to_string(),
            day_of_week: -1,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            timezone: "UTC".to_string(),
            epoch_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            is_active: true,
            created_at: Utc::now(),
        };

        assert!(TimeSlotTemplate::try_from(row).is_err());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let row = DbTimeSlot {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            subject: "Histoire".to_string(),
            day_of_week: 2,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            timezone: "Europe/Atlantis".to_string(),
            epoch_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            is_active: true,
            created_at: Utc::now(),
        };

        let err = TimeSlotTemplate::try_from(row).unwrap_err();
        assert!(err.to_string().contains("Europe/Atlantis"));
    }

    #[rstest]
    #[case("WEEKLY", json!({ "weeks": [1, 2] }), RecurrencePattern::Weekly)]
    #[case("CONSECUTIVE_DAYS", json!({ "consecutive_days": 3 }), RecurrencePattern::ConsecutiveDays)]
    #[case("ROUND_ROBIN", json!({}), RecurrencePattern::RoundRobin)]
    #[case("MANUAL", json!({}), RecurrencePattern::Manual)]
    fn assignment_row_converts(
        #[case] pattern: &str,
        #[case] config: serde_json::Value,
        #[case] expected: RecurrencePattern,
    ) {
        let assignment =
            TutorAssignment::try_from(assignment_row(pattern, config, "ACCEPTED")).unwrap();

        assert_eq!(assignment.pattern(), expected);
        assert_eq!(assignment.status, AssignmentStatus::Accepted);
    }

    #[rstest]
    #[case("WEEKLY", json!({ "weeks": [] }), "ACCEPTED")]
    #[case("BIWEEKLY", json!({}), "ACCEPTED")]
    #[case("MANUAL", json!({}), "MAYBE")]
    fn corrupt_assignment_row_is_rejected(
        #[case] pattern: &str,
        #[case] config: serde_json::Value,
        #[case] status: &str,
    ) {
        assert!(TutorAssignment::try_from(assignment_row(pattern, config, status)).is_err());
    }

    #[test]
    fn session_row_converts() {
        let start = Utc.with_ymd_and_hms(2024, 1, 8, 14, 0, 0).unwrap();
        let row = DbSession {
            id: Uuid::new_v4(),
            time_slot_id: None,
            class_id: Uuid::new_v4(),
            subject: "Chimie".to_string(),
            scheduled_start: start,
            scheduled_end: start + chrono::Duration::hours(1),
            tutor_id: None,
            status: "PENDING".to_string(),
        };

        let session = Session::try_from(row).unwrap();
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.time_slot_id, None);
    }

    #[test]
    fn commitment_kind_is_checked() {
        let row = DbCommitment {
            tutor_id: Uuid::new_v4(),
            session_id: None,
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            kind: "unavailability".to_string(),
        };
        assert_eq!(
            Commitment::try_from(row.clone()).unwrap().kind,
            CommitmentKind::Unavailability
        );

        let row = DbCommitment {
            kind: "holiday".to_string(),
            ..row
        };
        assert!(Commitment::try_from(row).is_err());
    }
}
