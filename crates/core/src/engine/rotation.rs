//! # Rotation Resolver
//!
//! Decides which tutor owns one occurrence of a time slot.
//!
//! ## Resolution order
//!
//! Only ACCEPTED assignments of the slot whose `[start_date, end_date]` covers
//! the occurrence are considered. Among those, the first rule that yields a
//! candidate wins:
//!
//! 1. **MANUAL**: any in-range manual assignment.
//! 2. **WEEKLY**: an assignment listing the occurrence's 1-based week number.
//! 3. **CONSECUTIVE_DAYS**: an assignment whose run of weekly occurrences,
//!    counted from its start date, has not elapsed yet.
//! 4. **ROUND_ROBIN**: the participants ordered by creation; the owner is
//!    `participants[week_offset mod len]`.
//!
//! When several assignments of rules 1-3 claim the same occurrence, the one
//! created first wins (ties broken by id) and the clash is reported as an
//! [`AmbiguousAssignment`] alongside the result.
//!
//! Week offsets are counted from the slot's epoch rather than from any
//! assignment, so a participant joining or leaving a rotation shifts only the
//! occurrences that have not been materialized yet.
//!
//! [`resolve`] is a pure function of its inputs.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    engine::calendar,
    models::{
        assignment::{AssignmentStatus, TutorAssignment},
        recurrence::{RecurrenceConfig, RecurrencePattern},
        time_slot::TimeSlotTemplate,
    },
};

/// Two or more assignments of the same pattern claimed one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousAssignment {
    pub time_slot_id: Uuid,
    pub date: NaiveDate,
    pub pattern: RecurrencePattern,
    /// Assignment that won the tie.
    pub winner: Uuid,
    /// Assignments that lost it, oldest first.
    pub overruled: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub tutor_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    pub pattern: Option<RecurrencePattern>,
    pub ambiguity: Option<AmbiguousAssignment>,
}

impl Resolution {
    pub fn unassigned() -> Self {
        Self {
            tutor_id: None,
            assignment_id: None,
            pattern: None,
            ambiguity: None,
        }
    }

    fn owned_by(assignment: &TutorAssignment, ambiguity: Option<AmbiguousAssignment>) -> Self {
        Self {
            tutor_id: Some(assignment.tutor_id),
            assignment_id: Some(assignment.id),
            pattern: Some(assignment.pattern()),
            ambiguity,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.tutor_id.is_some()
    }
}

/// Resolves the tutor for the occurrence of `slot` on `date`.
pub fn resolve(
    slot: &TimeSlotTemplate,
    date: NaiveDate,
    assignments: &[TutorAssignment],
) -> Resolution {
    let in_range: Vec<&TutorAssignment> = assignments
        .iter()
        .filter(|a| a.time_slot_id == slot.id)
        .filter(|a| a.status == AssignmentStatus::Accepted)
        .filter(|a| a.covers(date))
        .collect();

    if in_range.is_empty() {
        return Resolution::unassigned();
    }

    let week_offset = calendar::week_offset(slot, date);

    let manual = claimants(&in_range, |config| matches!(config, RecurrenceConfig::Manual));
    if let Some(resolution) = first_created(slot, date, RecurrencePattern::Manual, manual) {
        return resolution;
    }

    let weekly = claimants(&in_range, |config| match config {
        RecurrenceConfig::Weekly { weeks } => u32::try_from(week_offset + 1)
            .map(|week| weeks.contains(&week))
            .unwrap_or(false),
        _ => false,
    });
    if let Some(resolution) = first_created(slot, date, RecurrencePattern::Weekly, weekly) {
        return resolution;
    }

    let consecutive: Vec<&TutorAssignment> = in_range
        .iter()
        .copied()
        .filter(|a| match &a.recurrence {
            RecurrenceConfig::ConsecutiveDays { consecutive_days } => {
                date < a.start_date + Duration::weeks(i64::from(*consecutive_days))
            }
            _ => false,
        })
        .collect();
    if let Some(resolution) =
        first_created(slot, date, RecurrencePattern::ConsecutiveDays, consecutive)
    {
        return resolution;
    }

    let mut participants = claimants(&in_range, |config| {
        matches!(config, RecurrenceConfig::RoundRobin)
    });
    if participants.is_empty() {
        return Resolution::unassigned();
    }
    participants.sort_by_key(|a| (a.created_at, a.id));

    let len = participants.len() as i64;
    let owner = participants[week_offset.rem_euclid(len) as usize];

    Resolution::owned_by(owner, None)
}

fn claimants<'a>(
    in_range: &[&'a TutorAssignment],
    claims: impl Fn(&RecurrenceConfig) -> bool,
) -> Vec<&'a TutorAssignment> {
    in_range
        .iter()
        .copied()
        .filter(|a| claims(&a.recurrence))
        .collect()
}

/// Picks the oldest candidate and records a tie when there was more than one.
fn first_created(
    slot: &TimeSlotTemplate,
    date: NaiveDate,
    pattern: RecurrencePattern,
    mut candidates: Vec<&TutorAssignment>,
) -> Option<Resolution> {
    candidates.sort_by_key(|a| (a.created_at, a.id));
    let (winner, rest) = candidates.split_first()?;

    let ambiguity = (!rest.is_empty()).then(|| AmbiguousAssignment {
        time_slot_id: slot.id,
        date,
        pattern,
        winner: winner.id,
        overruled: rest.iter().map(|a| a.id).collect(),
    });

    Some(Resolution::owned_by(winner, ambiguity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Utc};
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot() -> TimeSlotTemplate {
        TimeSlotTemplate {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            subject: "Physique".to_string(),
            day_of_week: 1,
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            timezone: "UTC".to_string(),
            epoch: date(2024, 1, 1),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2023, 12, 30, 9, 0, 0).unwrap(),
        }
    }

    fn assignment(slot: &TimeSlotTemplate, recurrence: RecurrenceConfig, minute: u32) -> TutorAssignment {
        TutorAssignment {
            id: Uuid::new_v4(),
            time_slot_id: slot.id,
            tutor_id: Uuid::new_v4(),
            status: AssignmentStatus::Accepted,
            recurrence,
            start_date: slot.epoch,
            end_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, minute, 0).unwrap(),
        }
    }

    #[test]
    fn weekly_week_numbers_are_one_based() {
        let slot = slot();
        let weekly = assignment(
            &slot,
            RecurrenceConfig::Weekly { weeks: BTreeSet::from([1, 3]) },
            0,
        );
        let assignments = vec![weekly.clone()];

        assert_eq!(resolve(&slot, date(2024, 1, 1), &assignments).tutor_id, Some(weekly.tutor_id));
        assert_eq!(resolve(&slot, date(2024, 1, 8), &assignments).tutor_id, None);
        assert_eq!(resolve(&slot, date(2024, 1, 15), &assignments).tutor_id, Some(weekly.tutor_id));
    }

    #[test]
    fn weekly_never_matches_before_epoch() {
        let slot = slot();
        let mut weekly = assignment(
            &slot,
            RecurrenceConfig::Weekly { weeks: BTreeSet::from([1]) },
            0,
        );
        weekly.start_date = date(2023, 12, 1);

        assert!(!resolve(&slot, date(2023, 12, 25), &[weekly]).is_assigned());
    }

    #[test]
    fn equal_creation_time_breaks_tie_by_id() {
        let slot = slot();
        let mut first = assignment(&slot, RecurrenceConfig::Manual, 0);
        let mut second = assignment(&slot, RecurrenceConfig::Manual, 0);
        first.id = Uuid::from_u128(1);
        second.id = Uuid::from_u128(2);

        let resolution = resolve(&slot, date(2024, 1, 8), &[second.clone(), first.clone()]);

        assert_eq!(resolution.assignment_id, Some(first.id));
        assert_eq!(resolution.ambiguity.unwrap().overruled, vec![second.id]);
    }

    #[test]
    fn assignments_of_other_slots_are_ignored() {
        let slot = slot();
        let mut foreign = assignment(&slot, RecurrenceConfig::Manual, 0);
        foreign.time_slot_id = Uuid::new_v4();

        assert!(!resolve(&slot, date(2024, 1, 8), &[foreign]).is_assigned());
    }
}
