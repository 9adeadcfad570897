//! Read-only calendar preview of a slot's upcoming tutors.
//!
//! Walks the same occurrence dates and runs the same resolver as the
//! materializer, but writes nothing and skips the conflict check. Occurrences
//! the materializer would skip as `past` or `nonexistent-local-time` are left
//! out. Without conflicts, a materialization at the same `now` writes exactly
//! the sessions shown here.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    engine::{calendar, rotation},
    models::{assignment::TutorAssignment, time_slot::TimeSlotTemplate},
};

/// Label shown for an occurrence no tutor owns.
pub const UNASSIGNED_LABEL: &str = "Non assigné";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    pub week_start: NaiveDate,
    pub session_date: NaiveDate,
    pub tutor_id: Option<Uuid>,
    pub tutor_name: String,
}

/// Lists the next `weeks_ahead` occurrences of `slot` with their tutor.
///
/// `now` is read the way the materializer reads it: today is `now` seen in the
/// slot's zone, and an occurrence that already started is dropped.
///
/// An inactive slot previews as empty, matching the materializer. Names come
/// from `tutor_names`; a tutor missing from it is shown by id.
pub fn preview(
    slot: &TimeSlotTemplate,
    assignments: &[TutorAssignment],
    weeks_ahead: u32,
    now: DateTime<Utc>,
    tutor_names: &HashMap<Uuid, String>,
) -> Vec<PreviewEntry> {
    if !slot.is_active {
        return Vec::new();
    }

    let today = now.with_timezone(&slot.tz()).date_naive();
    calendar::occurrence_dates(slot, today, weeks_ahead)
        .into_iter()
        .filter(|date| {
            calendar::occurrence_window(slot, *date).is_some_and(|(start, _)| start >= now)
        })
        .map(|session_date| {
            let tutor_id = rotation::resolve(slot, session_date, assignments).tutor_id;
            let tutor_name = match tutor_id {
                Some(id) => tutor_names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| id.to_string()),
                None => UNASSIGNED_LABEL.to_string(),
            };

            PreviewEntry {
                week_start: calendar::week_start(session_date),
                session_date,
                tutor_id,
                tutor_name,
            }
        })
        .collect()
}
