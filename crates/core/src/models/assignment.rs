use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    errors::{RotaError, RotaResult},
    models::recurrence::{RecurrenceConfig, RecurrencePattern},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Pending,
    Accepted,
    Declined,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "PENDING",
            AssignmentStatus::Accepted => "ACCEPTED",
            AssignmentStatus::Declined => "DECLINED",
        }
    }

    /// Applies the tutor's answer to an invitation.
    ///
    /// Only a PENDING assignment can move, and only to ACCEPTED or DECLINED.
    pub fn transition(self, to: AssignmentStatus) -> RotaResult<AssignmentStatus> {
        match (self, to) {
            (AssignmentStatus::Pending, AssignmentStatus::Accepted)
            | (AssignmentStatus::Pending, AssignmentStatus::Declined) => Ok(to),
            (from, to) => Err(RotaError::InvalidTransition(format!(
                "assignment cannot move from {} to {}",
                from, to
            ))),
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = RotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AssignmentStatus::Pending),
            "ACCEPTED" => Ok(AssignmentStatus::Accepted),
            "DECLINED" => Ok(AssignmentStatus::Declined),
            other => Err(RotaError::Validation(format!(
                "Unknown assignment status: {}",
                other
            ))),
        }
    }
}

/// A tutor's claim on a time slot under one rotation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorAssignment {
    pub id: Uuid,
    pub time_slot_id: Uuid,
    pub tutor_id: Uuid,
    pub status: AssignmentStatus,
    pub recurrence: RecurrenceConfig,
    pub start_date: NaiveDate,
    /// `None` leaves the assignment open-ended.
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl TutorAssignment {
    pub fn pattern(&self) -> RecurrencePattern {
        self.recurrence.pattern()
    }

    /// Whether `date` lies inside `[start_date, end_date]`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub tutor_id: Uuid,
    pub recurrence_pattern: RecurrencePattern,
    #[serde(default)]
    pub recurrence_config: Value,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CreateAssignmentRequest {
    /// Checks the request and returns its parsed rotation policy.
    pub fn validate(&self) -> RotaResult<RecurrenceConfig> {
        if let Some(end_date) = self.end_date {
            if end_date < self.start_date {
                return Err(RotaError::Validation(format!(
                    "end_date {} is before start_date {}",
                    end_date, self.start_date
                )));
            }
        }

        RecurrenceConfig::from_parts(self.recurrence_pattern, &self.recurrence_config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondAssignmentRequest {
    pub accept: bool,
}

impl RespondAssignmentRequest {
    pub fn target_status(&self) -> AssignmentStatus {
        if self.accept {
            AssignmentStatus::Accepted
        } else {
            AssignmentStatus::Declined
        }
    }
}
