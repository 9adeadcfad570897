//! # Session Materializer
//!
//! Expands a time slot over a forward horizon into stored sessions.
//!
//! For every occurrence date in the horizon the materializer:
//!
//! 1. skips the date if the slot is inactive, the occurrence already started,
//!    or a session already exists for `(time_slot_id, scheduled_start)`
//! 2. resolves the owning tutor with [`rotation::resolve`]
//! 3. checks the tutor for double bookings with [`ConflictChecker`]
//! 4. inserts the session through [`SessionStore::insert_if_absent`]
//!
//! A conflicting tutor is dropped from the session rather than the session
//! being dropped: the row is written unassigned and PENDING and the occurrence
//! is reported as skipped with reason `tutor-conflict`.
//!
//! Running the same call twice writes nothing the second time. Two concurrent
//! calls are kept apart by the store's unique key; the loser of an insert race
//! reports `already-materialized`.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    engine::{calendar, conflict::ConflictChecker, rotation},
    errors::RotaResult,
    models::{
        session::{NewSession, Session, SessionStatus},
        time_slot::TimeSlotTemplate,
    },
    store::{AssignmentStore, BookingStore, SessionStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    Past,
    SlotInactive,
    AlreadyMaterialized,
    /// The session was written, but without the resolved tutor.
    TutorConflict,
    NonexistentLocalTime,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Past => "past",
            SkipReason::SlotInactive => "slot-inactive",
            SkipReason::AlreadyMaterialized => "already-materialized",
            SkipReason::TutorConflict => "tutor-conflict",
            SkipReason::NonexistentLocalTime => "nonexistent-local-time",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An occurrence the materializer did not turn into an assigned session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedOccurrence {
    pub time_slot_id: Uuid,
    pub date: NaiveDate,
    pub scheduled_start: Option<DateTime<Utc>>,
    /// Tutor the rotation picked, for `tutor-conflict`.
    pub tutor_id: Option<Uuid>,
    /// Session written anyway, for `tutor-conflict`.
    pub session_id: Option<Uuid>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub time_slot_id: Uuid,
    pub class_id: Uuid,
    pub created: Vec<Session>,
    pub skipped: Vec<SkippedOccurrence>,
}

impl MaterializeReport {
    fn new(slot: &TimeSlotTemplate) -> Self {
        Self {
            time_slot_id: slot.id,
            class_id: slot.class_id,
            created: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn skip(
        &mut self,
        date: NaiveDate,
        scheduled_start: Option<DateTime<Utc>>,
        reason: SkipReason,
    ) {
        self.skipped.push(SkippedOccurrence {
            time_slot_id: self.time_slot_id,
            date,
            scheduled_start,
            tutor_id: None,
            session_id: None,
            reason,
        });
    }

    /// Created sessions that received a tutor.
    pub fn assigned(&self) -> Vec<&Session> {
        self.created.iter().filter(|s| s.tutor_id.is_some()).collect()
    }

    /// Created sessions left without a tutor.
    pub fn unassigned(&self) -> Vec<&Session> {
        self.created.iter().filter(|s| s.tutor_id.is_none()).collect()
    }

    pub fn created_ids(&self) -> Vec<Uuid> {
        self.created.iter().map(|s| s.id).collect()
    }

    pub fn skipped_with(&self, reason: SkipReason) -> Vec<&SkippedOccurrence> {
        self.skipped.iter().filter(|s| s.reason == reason).collect()
    }
}

/// Outcome of materializing several slots in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub sessions_created: usize,
    /// Distinct classes that received at least one new session.
    pub classes_touched: usize,
    pub reports: Vec<MaterializeReport>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "{} sessions generated across {} classes",
            self.sessions_created, self.classes_touched
        )
    }
}

pub struct SessionMaterializer<'a> {
    sessions: &'a dyn SessionStore,
    assignments: &'a dyn AssignmentStore,
    bookings: &'a dyn BookingStore,
}

impl<'a> SessionMaterializer<'a> {
    pub fn new(
        sessions: &'a dyn SessionStore,
        assignments: &'a dyn AssignmentStore,
        bookings: &'a dyn BookingStore,
    ) -> Self {
        Self {
            sessions,
            assignments,
            bookings,
        }
    }

    /// Materializes the next `weeks_ahead` occurrences of `slot`.
    ///
    /// `now` fixes both the current instant and, seen in the slot's zone,
    /// the date the horizon starts from.
    ///
    /// # Errors
    ///
    /// * `RotaError::Database` - a store read or write failed
    pub async fn materialize(
        &self,
        slot: &TimeSlotTemplate,
        weeks_ahead: u32,
        now: DateTime<Utc>,
    ) -> RotaResult<MaterializeReport> {
        let today = now.with_timezone(&slot.tz()).date_naive();
        let dates = calendar::occurrence_dates(slot, today, weeks_ahead);
        let mut report = MaterializeReport::new(slot);

        if !slot.is_active {
            debug!("Slot {} is inactive, nothing to materialize", slot.id);
            for date in dates {
                report.skip(date, None, SkipReason::SlotInactive);
            }
            return Ok(report);
        }

        let assignments = self.assignments.accepted_assignments(slot.id).await?;
        let checker = ConflictChecker::new(self.bookings);

        for date in dates {
            let Some((scheduled_start, scheduled_end)) = calendar::occurrence_window(slot, date)
            else {
                warn!(
                    "Slot {} has no {} - {} on {} in {}",
                    slot.id, slot.start_time, slot.end_time, date, slot.timezone
                );
                report.skip(date, None, SkipReason::NonexistentLocalTime);
                continue;
            };

            if scheduled_start < now {
                report.skip(date, Some(scheduled_start), SkipReason::Past);
                continue;
            }

            if self.sessions.session_exists(slot.id, scheduled_start).await? {
                report.skip(date, Some(scheduled_start), SkipReason::AlreadyMaterialized);
                continue;
            }

            let resolution = rotation::resolve(slot, date, &assignments);
            if let Some(ambiguity) = &resolution.ambiguity {
                warn!(
                    "Ambiguous {} assignments on slot {} for {}: kept {}, overruled {:?}",
                    ambiguity.pattern,
                    slot.id,
                    date,
                    ambiguity.winner,
                    ambiguity.overruled
                );
            }

            let conflicted = match resolution.tutor_id {
                Some(tutor_id) => {
                    checker
                        .has_conflict(tutor_id, scheduled_start, scheduled_end, None)
                        .await?
                }
                None => false,
            };

            let (tutor_id, status) = match resolution.tutor_id {
                Some(tutor_id) if !conflicted => (Some(tutor_id), SessionStatus::Confirmed),
                _ => (None, SessionStatus::Pending),
            };

            let new_session = NewSession {
                time_slot_id: slot.id,
                class_id: slot.class_id,
                subject: slot.subject.clone(),
                scheduled_start,
                scheduled_end,
                tutor_id,
                status,
            };

            match self.sessions.insert_if_absent(&new_session).await? {
                Some(session) => {
                    debug!(
                        "Materialized session {} for slot {} on {} (tutor {:?})",
                        session.id, slot.id, date, session.tutor_id
                    );
                    if conflicted {
                        report.skipped.push(SkippedOccurrence {
                            time_slot_id: slot.id,
                            date,
                            scheduled_start: Some(scheduled_start),
                            tutor_id: resolution.tutor_id,
                            session_id: Some(session.id),
                            reason: SkipReason::TutorConflict,
                        });
                    }
                    report.created.push(session);
                }
                None => {
                    debug!(
                        "Session for slot {} at {} was written concurrently",
                        slot.id, scheduled_start
                    );
                    report.skip(date, Some(scheduled_start), SkipReason::AlreadyMaterialized);
                }
            }
        }

        info!(
            "Slot {}: {} sessions created ({} unassigned), {} occurrences skipped",
            slot.id,
            report.created.len(),
            report.unassigned().len(),
            report.skipped.len()
        );

        Ok(report)
    }

    /// Materializes every slot in turn and totals the result.
    pub async fn materialize_many(
        &self,
        slots: &[TimeSlotTemplate],
        weeks_ahead: u32,
        now: DateTime<Utc>,
    ) -> RotaResult<BatchReport> {
        let mut reports = Vec::with_capacity(slots.len());
        for slot in slots {
            reports.push(self.materialize(slot, weeks_ahead, now).await?);
        }

        let sessions_created = reports.iter().map(|r| r.created.len()).sum();
        let classes_touched = reports
            .iter()
            .filter(|r| !r.created.is_empty())
            .map(|r| r.class_id)
            .collect::<HashSet<_>>()
            .len();

        let batch = BatchReport {
            sessions_created,
            classes_touched,
            reports,
        };
        info!("{}", batch.summary());

        Ok(batch)
    }
}
