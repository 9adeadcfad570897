//! Tutor double-booking detection.
//!
//! Advisory only: the checker reads the tutor's commitments and reports an
//! overlap, the caller decides what to do with it. Reads are optimistic, a
//! booking written concurrently may be missed and corrected later.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::{errors::RotaResult, store::BookingStore};

/// Half-open interval intersection: `[a_start, a_end)` meets `[b_start, b_end)`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub struct ConflictChecker<'a> {
    bookings: &'a dyn BookingStore,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(bookings: &'a dyn BookingStore) -> Self {
        Self { bookings }
    }

    /// Whether `tutor_id` is already committed somewhere in
    /// `[scheduled_start, scheduled_end)`.
    ///
    /// `exclude_session_id` skips the session being re-checked, so a session
    /// never conflicts with itself.
    pub async fn has_conflict(
        &self,
        tutor_id: Uuid,
        scheduled_start: DateTime<Utc>,
        scheduled_end: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> RotaResult<bool> {
        let commitments = self
            .bookings
            .tutor_commitments(tutor_id, scheduled_start, scheduled_end)
            .await?;

        let clash = commitments
            .iter()
            .filter(|c| c.session_id.is_none() || c.session_id != exclude_session_id)
            .find(|c| overlaps(c.start, c.end, scheduled_start, scheduled_end));

        if let Some(commitment) = clash {
            debug!(
                "Tutor {} is busy {} - {} ({:?})",
                tutor_id, commitment.start, commitment.end, commitment.kind
            );
        }

        Ok(clash.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, hour, minute, 0).unwrap()
    }

    #[rstest]
    #[case(at(14, 0), at(15, 0), true)]
    #[case(at(13, 30), at(14, 30), true)]
    #[case(at(14, 30), at(14, 45), true)]
    #[case(at(13, 0), at(16, 0), true)]
    #[case(at(15, 0), at(16, 0), false)]
    #[case(at(13, 0), at(14, 0), false)]
    #[case(at(9, 0), at(10, 0), false)]
    fn half_open_overlap(
        #[case] start: DateTime<Utc>,
        #[case] end: DateTime<Utc>,
        #[case] expected: bool,
    ) {
        let slot_start = at(14, 0);
        let slot_end = slot_start + Duration::hours(1);

        assert_eq!(overlaps(start, end, slot_start, slot_end), expected);
        assert_eq!(overlaps(slot_start, slot_end, start, end), expected);
    }
}
