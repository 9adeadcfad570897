use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{
    engine::calendar,
    errors::{RotaError, RotaResult},
};

/// One recurring weekly commitment of a class.
///
/// `day_of_week` counts from 0 = Sunday. A template is never moved to another
/// day; the class deactivates it and creates a new one instead, which keeps
/// already materialized sessions valid history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotTemplate {
    pub id: Uuid,
    pub class_id: Uuid,
    pub subject: String,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// IANA zone the wall-clock times are expressed in.
    pub timezone: String,
    /// Date of week 0, the first occurrence on or after creation.
    pub epoch: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TimeSlotTemplate {
    pub fn weekday(&self) -> Option<Weekday> {
        calendar::weekday_from_index(self.day_of_week)
    }

    /// Zone used to place occurrences on the absolute timeline.
    ///
    /// Zones are checked when the template is created and when it is loaded.
    /// A name that still fails to parse is read as UTC, with a warning.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            warn!(
                "Time slot {} has unknown timezone {:?}, using UTC",
                self.id, self.timezone
            );
            Tz::UTC
        })
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeSlotRequest {
    pub class_id: Uuid,
    pub subject: String,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl CreateTimeSlotRequest {
    pub fn validate(&self) -> RotaResult<()> {
        if self.subject.trim().is_empty() {
            return Err(RotaError::Validation("Subject cannot be empty".to_string()));
        }

        if calendar::weekday_from_index(self.day_of_week).is_none() {
            return Err(RotaError::Validation(format!(
                "day_of_week must be between 0 and 6, got {}",
                self.day_of_week
            )));
        }

        if self.start_time >= self.end_time {
            return Err(RotaError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        self.timezone.parse::<Tz>().map_err(|_| {
            RotaError::Validation(format!("Unknown timezone: {}", self.timezone))
        })?;

        Ok(())
    }

    /// Week-0 anchor for a template created at `created_at`.
    pub fn epoch_for(&self, created_at: DateTime<Utc>) -> RotaResult<NaiveDate> {
        self.validate()?;

        let tz: Tz = self.timezone.parse().unwrap_or(Tz::UTC);
        let weekday = calendar::weekday_from_index(self.day_of_week).ok_or_else(|| {
            RotaError::Validation(format!("Invalid day_of_week {}", self.day_of_week))
        })?;
        let local_date = created_at.with_timezone(&tz).date_naive();

        Ok(calendar::next_occurrence_on_or_after(local_date, weekday))
    }
}
