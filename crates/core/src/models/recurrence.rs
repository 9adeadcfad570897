//! Rotation policies a tutor assignment can follow.
//!
//! A policy is stored as a pattern name plus a JSON payload. Both halves are
//! checked together by [`RecurrenceConfig::from_parts`], which is the only way
//! to obtain a [`RecurrenceConfig`], so every value past that point is well formed.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{RotaError, RotaResult};

/// Pattern discriminant.
///
/// The declaration order is the resolution priority: a lower variant beats a
/// higher one when both claim the same occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrencePattern {
    Manual,
    Weekly,
    ConsecutiveDays,
    RoundRobin,
}

impl RecurrencePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Manual => "MANUAL",
            RecurrencePattern::Weekly => "WEEKLY",
            RecurrencePattern::ConsecutiveDays => "CONSECUTIVE_DAYS",
            RecurrencePattern::RoundRobin => "ROUND_ROBIN",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrencePattern {
    type Err = RotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANUAL" => Ok(RecurrencePattern::Manual),
            "WEEKLY" => Ok(RecurrencePattern::Weekly),
            "CONSECUTIVE_DAYS" => Ok(RecurrencePattern::ConsecutiveDays),
            "ROUND_ROBIN" => Ok(RecurrencePattern::RoundRobin),
            other => Err(RotaError::Validation(format!(
                "Unknown recurrence pattern: {}",
                other
            ))),
        }
    }
}

/// A validated rotation policy with its pattern-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecurrence", into = "StoredRecurrence")]
pub enum RecurrenceConfig {
    /// Owns every occurrence inside the assignment's date range.
    Manual,
    /// Owns the occurrences whose 1-based week number is listed.
    Weekly { weeks: BTreeSet<u32> },
    /// Owns an unbroken run of `consecutive_days` weekly occurrences from the start date.
    ConsecutiveDays { consecutive_days: u32 },
    /// Shares a cyclic rotation with the slot's other round robin assignments.
    RoundRobin,
}

impl RecurrenceConfig {
    pub fn pattern(&self) -> RecurrencePattern {
        match self {
            RecurrenceConfig::Manual => RecurrencePattern::Manual,
            RecurrenceConfig::Weekly { .. } => RecurrencePattern::Weekly,
            RecurrenceConfig::ConsecutiveDays { .. } => RecurrencePattern::ConsecutiveDays,
            RecurrenceConfig::RoundRobin => RecurrencePattern::RoundRobin,
        }
    }

    /// Builds a config from a pattern and its raw JSON payload.
    ///
    /// # Errors
    ///
    /// * `RotaError::Validation` - WEEKLY without a non-empty list of positive
    ///   week numbers, or CONSECUTIVE_DAYS without a positive integer run length
    pub fn from_parts(pattern: RecurrencePattern, config: &Value) -> RotaResult<Self> {
        match pattern {
            RecurrencePattern::Manual => Ok(RecurrenceConfig::Manual),
            RecurrencePattern::RoundRobin => Ok(RecurrenceConfig::RoundRobin),
            RecurrencePattern::Weekly => {
                let raw = config
                    .get("weeks")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        RotaError::Validation("WEEKLY requires a `weeks` array".to_string())
                    })?;

                let weeks = raw
                    .iter()
                    .map(|week| {
                        week.as_u64()
                            .filter(|n| *n >= 1)
                            .and_then(|n| u32::try_from(n).ok())
                            .ok_or_else(|| {
                                RotaError::Validation(format!(
                                    "WEEKLY week numbers must be positive integers, got {}",
                                    week
                                ))
                            })
                    })
                    .collect::<RotaResult<BTreeSet<u32>>>()?;

                if weeks.is_empty() {
                    return Err(RotaError::Validation(
                        "WEEKLY requires at least one week".to_string(),
                    ));
                }

                Ok(RecurrenceConfig::Weekly { weeks })
            }
            RecurrencePattern::ConsecutiveDays => {
                let raw = config
                    .get("consecutive_days")
                    .or_else(|| config.get("consecutiveDays"))
                    .ok_or_else(|| {
                        RotaError::Validation(
                            "CONSECUTIVE_DAYS requires `consecutive_days`".to_string(),
                        )
                    })?;

                let consecutive_days = raw
                    .as_u64()
                    .filter(|n| *n >= 1)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        RotaError::Validation(format!(
                            "`consecutive_days` must be a positive integer, got {}",
                            raw
                        ))
                    })?;

                Ok(RecurrenceConfig::ConsecutiveDays { consecutive_days })
            }
        }
    }

    /// JSON payload as stored next to the pattern name.
    pub fn config_json(&self) -> Value {
        match self {
            RecurrenceConfig::Manual | RecurrenceConfig::RoundRobin => json!({}),
            RecurrenceConfig::Weekly { weeks } => json!({ "weeks": weeks }),
            RecurrenceConfig::ConsecutiveDays { consecutive_days } => {
                json!({ "consecutive_days": consecutive_days })
            }
        }
    }
}

/// Wire and storage shape of a [`RecurrenceConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecurrence {
    pub pattern: RecurrencePattern,
    #[serde(default)]
    pub config: Value,
}

impl TryFrom<StoredRecurrence> for RecurrenceConfig {
    type Error = RotaError;

    fn try_from(stored: StoredRecurrence) -> Result<Self, Self::Error> {
        RecurrenceConfig::from_parts(stored.pattern, &stored.config)
    }
}

impl From<RecurrenceConfig> for StoredRecurrence {
    fn from(recurrence: RecurrenceConfig) -> Self {
        StoredRecurrence {
            pattern: recurrence.pattern(),
            config: recurrence.config_json(),
        }
    }
}
