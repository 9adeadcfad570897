use classrota_api::config::{Horizon, horizon_from, parse_log_level};
use classrota_core::errors::RotaError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing::Level;

#[test]
fn test_default_horizon() {
    let horizon = horizon_from(None, None).unwrap();

    assert_eq!(horizon, Horizon::default());
    assert_eq!(horizon.default_weeks, 4);
    assert_eq!(horizon.max_weeks, 26);
}

#[test]
fn test_horizon_from_env_values() {
    let horizon = horizon_from(Some("8"), Some(" 52 ")).unwrap();

    assert_eq!(
        horizon,
        Horizon {
            default_weeks: 8,
            max_weeks: 52
        }
    );
}

#[rstest]
#[case(Some("0"), None)]
#[case(Some("30"), None)]
#[case(Some("four"), None)]
#[case(None, Some("-1"))]
fn test_invalid_horizon_is_rejected(#[case] default_weeks: Option<&str>, #[case] max_weeks: Option<&str>) {
    assert!(horizon_from(default_weeks, max_weeks).is_err());
}

#[rstest]
#[case(None, 4)]
#[case(Some(1), 1)]
#[case(Some(26), 26)]
fn test_weeks_ahead_within_bounds(#[case] requested: Option<u32>, #[case] expected: u32) {
    assert_eq!(Horizon::default().weeks_ahead(requested).unwrap(), expected);
}

#[rstest]
#[case(0)]
#[case(27)]
fn test_weeks_ahead_out_of_bounds(#[case] requested: u32) {
    let result = Horizon::default().weeks_ahead(Some(requested));

    assert!(matches!(result, Err(RotaError::Validation(_))));
}

#[rstest]
#[case("trace", Level::TRACE)]
#[case("DEBUG", Level::DEBUG)]
#[case("warn", Level::WARN)]
#[case("verbose", Level::INFO)]
fn test_parse_log_level(#[case] value: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(value), expected);
}
