use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use classrota_core::{
    errors::RotaError,
    models::{
        assignment::{AssignmentStatus, CreateAssignmentRequest, RespondAssignmentRequest},
        recurrence::{RecurrenceConfig, RecurrencePattern},
        time_slot::CreateTimeSlotRequest,
    },
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_string, Value};
use std::collections::BTreeSet;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[rstest]
#[case(RecurrencePattern::Weekly, json!({}))]
#[case(RecurrencePattern::Weekly, json!({ "weeks": [] }))]
#[case(RecurrencePattern::Weekly, json!({ "weeks": [0, 2] }))]
#[case(RecurrencePattern::Weekly, json!({ "weeks": [-1] }))]
#[case(RecurrencePattern::Weekly, json!({ "weeks": ["1"] }))]
#[case(RecurrencePattern::ConsecutiveDays, json!({}))]
#[case(RecurrencePattern::ConsecutiveDays, json!({ "consecutive_days": 0 }))]
#[case(RecurrencePattern::ConsecutiveDays, json!({ "consecutive_days": -3 }))]
#[case(RecurrencePattern::ConsecutiveDays, json!({ "consecutive_days": 1.5 }))]
#[case(RecurrencePattern::ConsecutiveDays, json!({ "consecutive_days": "2" }))]
fn test_malformed_recurrence_is_rejected(#[case] pattern: RecurrencePattern, #[case] config: Value) {
    let result = RecurrenceConfig::from_parts(pattern, &config);

    assert!(matches!(result, Err(RotaError::Validation(_))), "{:?}", result);
}

#[test]
fn test_weekly_collapses_duplicates() {
    let config =
        RecurrenceConfig::from_parts(RecurrencePattern::Weekly, &json!({ "weeks": [3, 1, 3] }))
            .unwrap();

    assert_eq!(config, RecurrenceConfig::Weekly { weeks: BTreeSet::from([1, 3]) });
}

#[test]
fn test_consecutive_days_accepts_camel_case_key() {
    let config = RecurrenceConfig::from_parts(
        RecurrencePattern::ConsecutiveDays,
        &json!({ "consecutiveDays": 2 }),
    )
    .unwrap();

    assert_eq!(config, RecurrenceConfig::ConsecutiveDays { consecutive_days: 2 });
}

#[rstest]
#[case(RecurrencePattern::Manual, RecurrenceConfig::Manual)]
#[case(RecurrencePattern::RoundRobin, RecurrenceConfig::RoundRobin)]
fn test_payload_free_patterns_ignore_config(
    #[case] pattern: RecurrencePattern,
    #[case] expected: RecurrenceConfig,
) {
    assert_eq!(RecurrenceConfig::from_parts(pattern, &Value::Null).unwrap(), expected);
    assert_eq!(RecurrenceConfig::from_parts(pattern, &json!({})).unwrap(), expected);
}

#[test]
fn test_pattern_priority_order() {
    assert!(RecurrencePattern::Manual < RecurrencePattern::Weekly);
    assert!(RecurrencePattern::Weekly < RecurrencePattern::ConsecutiveDays);
    assert!(RecurrencePattern::ConsecutiveDays < RecurrencePattern::RoundRobin);
}

#[test]
fn test_pattern_string_names() {
    for pattern in [
        RecurrencePattern::Manual,
        RecurrencePattern::Weekly,
        RecurrencePattern::ConsecutiveDays,
        RecurrencePattern::RoundRobin,
    ] {
        assert_eq!(pattern.as_str().parse::<RecurrencePattern>().unwrap(), pattern);
    }

    assert!("BIWEEKLY".parse::<RecurrencePattern>().is_err());
}

#[test]
fn test_recurrence_serialized_shape() {
    let config = RecurrenceConfig::ConsecutiveDays { consecutive_days: 3 };

    let json: Value = serde_json::to_value(&config).unwrap();
    assert_eq!(
        json,
        json!({ "pattern": "CONSECUTIVE_DAYS", "config": { "consecutive_days": 3 } })
    );
}

#[test]
fn test_recurrence_deserialization_validates() {
    let bad = r#"{ "pattern": "WEEKLY", "config": { "weeks": [] } }"#;
    assert!(from_str::<RecurrenceConfig>(bad).is_err());

    let good = r#"{ "pattern": "WEEKLY", "config": { "weeks": [2] } }"#;
    let config: RecurrenceConfig = from_str(good).unwrap();
    assert_eq!(config.pattern(), RecurrencePattern::Weekly);
    assert_eq!(from_str::<RecurrenceConfig>(&to_string(&config).unwrap()).unwrap(), config);
}

#[rstest]
#[case(AssignmentStatus::Pending, AssignmentStatus::Accepted, true)]
#[case(AssignmentStatus::Pending, AssignmentStatus::Declined, true)]
#[case(AssignmentStatus::Pending, AssignmentStatus::Pending, false)]
#[case(AssignmentStatus::Accepted, AssignmentStatus::Declined, false)]
#[case(AssignmentStatus::Declined, AssignmentStatus::Accepted, false)]
#[case(AssignmentStatus::Accepted, AssignmentStatus::Accepted, false)]
fn test_assignment_status_transition(
    #[case] from: AssignmentStatus,
    #[case] to: AssignmentStatus,
    #[case] allowed: bool,
) {
    let result = from.transition(to);

    if allowed {
        assert_eq!(result.unwrap(), to);
    } else {
        assert!(matches!(result, Err(RotaError::InvalidTransition(_))));
    }
}

#[test]
fn test_respond_request_target_status() {
    assert_eq!(
        RespondAssignmentRequest { accept: true }.target_status(),
        AssignmentStatus::Accepted
    );
    assert_eq!(
        RespondAssignmentRequest { accept: false }.target_status(),
        AssignmentStatus::Declined
    );
}

#[test]
fn test_create_assignment_request_validation() {
    let mut request = CreateAssignmentRequest {
        tutor_id: Uuid::new_v4(),
        recurrence_pattern: RecurrencePattern::ConsecutiveDays,
        recurrence_config: json!({ "consecutive_days": 2 }),
        start_date: date(2024, 1, 8),
        end_date: None,
    };
    assert_eq!(
        request.validate().unwrap(),
        RecurrenceConfig::ConsecutiveDays { consecutive_days: 2 }
    );

    request.end_date = Some(date(2024, 1, 1));
    assert!(matches!(request.validate(), Err(RotaError::Validation(_))));

    request.end_date = Some(date(2024, 1, 8));
    request.recurrence_config = json!({ "consecutive_days": 0 });
    assert!(matches!(request.validate(), Err(RotaError::Validation(_))));
}

#[test]
fn test_create_assignment_request_defaults_config() {
    let body = r#"{
        "tutor_id": "6f1c1f2a-4d6a-4b1e-9a53-2b7a6e0f2c11",
        "recurrence_pattern": "ROUND_ROBIN",
        "start_date": "2024-01-08",
        "end_date": null
    }"#;
    let request: CreateAssignmentRequest = from_str(body).unwrap();

    assert_eq!(request.recurrence_config, Value::Null);
    assert_eq!(request.validate().unwrap(), RecurrenceConfig::RoundRobin);
}

fn slot_request() -> CreateTimeSlotRequest {
    CreateTimeSlotRequest {
        class_id: Uuid::new_v4(),
        subject: "Mathématiques".to_string(),
        day_of_week: 1,
        start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        timezone: "Europe/Paris".to_string(),
    }
}

#[rstest]
#[case::bad_day(|r: &mut CreateTimeSlotRequest| r.day_of_week = 7)]
#[case::inverted(|r: &mut CreateTimeSlotRequest| r.end_time = NaiveTime::from_hms_opt(13, 0, 0).unwrap())]
#[case::empty_window(|r: &mut CreateTimeSlotRequest| r.end_time = r.start_time)]
#[case::bad_zone(|r: &mut CreateTimeSlotRequest| r.timezone = "Mars/Olympus".to_string())]
#[case::blank_subject(|r: &mut CreateTimeSlotRequest| r.subject = "  ".to_string())]
fn test_invalid_time_slot_request(#[case] corrupt: fn(&mut CreateTimeSlotRequest)) {
    let mut request = slot_request();
    corrupt(&mut request);

    assert!(matches!(request.validate(), Err(RotaError::Validation(_))));
}

#[test]
fn test_time_slot_epoch_is_next_matching_day() {
    let request = slot_request();

    // Wednesday 2024-01-03 -> following Monday
    let created_at = Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap();
    assert_eq!(request.epoch_for(created_at).unwrap(), date(2024, 1, 8));

    // Monday itself is week 0
    let created_at = Utc.with_ymd_and_hms(2024, 1, 8, 10, 0, 0).unwrap();
    assert_eq!(request.epoch_for(created_at).unwrap(), date(2024, 1, 8));
}

#[test]
fn test_time_slot_epoch_uses_local_date() {
    let mut request = slot_request();
    request.timezone = "Pacific/Auckland".to_string();

    // Sunday 23:00 UTC is already Monday in Auckland
    let created_at = Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap();
    assert_eq!(request.epoch_for(created_at).unwrap(), date(2024, 1, 8));
}
