//! Date arithmetic shared by the materializer and the preview.
//!
//! Both walk the same occurrence dates, so a preview always describes the
//! sessions a later materialization would write.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

use crate::models::time_slot::TimeSlotTemplate;

/// Maps a 0 = Sunday day index onto a [`Weekday`].
pub fn weekday_from_index(day_of_week: u8) -> Option<Weekday> {
    match day_of_week {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn next_occurrence_on_or_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let target = i64::from(weekday.num_days_from_sunday());
    let current = i64::from(date.weekday().num_days_from_sunday());

    date + Duration::days((target - current).rem_euclid(7))
}

/// The first `weeks_ahead` occurrence dates on or after `today`.
pub fn occurrence_dates(slot: &TimeSlotTemplate, today: NaiveDate, weeks_ahead: u32) -> Vec<NaiveDate> {
    let Some(weekday) = slot.weekday() else {
        return Vec::new();
    };
    let first = next_occurrence_on_or_after(today, weekday);

    (0..weeks_ahead)
        .map(|week| first + Duration::weeks(i64::from(week)))
        .collect()
}

/// Whole weeks between the slot's epoch and `date`, negative before the epoch.
pub fn week_offset(slot: &TimeSlotTemplate, date: NaiveDate) -> i64 {
    (date - slot.epoch).num_days().div_euclid(7)
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Absolute start and end of the occurrence on `date`.
///
/// Returns `None` when a wall-clock bound does not exist in the slot's zone
/// (the skipped hour of a daylight saving change). A repeated hour resolves
/// to its earlier instant.
pub fn occurrence_window(
    slot: &TimeSlotTemplate,
    date: NaiveDate,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = slot.tz();
    let start = tz
        .from_local_datetime(&date.and_time(slot.start_time))
        .earliest()?;
    let end = tz
        .from_local_datetime(&date.and_time(slot.end_time))
        .earliest()?;

    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}
