use axum::http::StatusCode;
use classrota_api::middleware::error_handling::{AppError, map_error};
use classrota_core::errors::RotaError;
use rstest::rstest;

#[rstest]
#[case(RotaError::NotFound("Time slot".to_string()), StatusCode::NOT_FOUND)]
#[case(RotaError::Validation("weeks_ahead".to_string()), StatusCode::BAD_REQUEST)]
#[case(RotaError::InvalidTransition("ACCEPTED -> DECLINED".to_string()), StatusCode::CONFLICT)]
#[case(RotaError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: RotaError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[test]
fn test_error_handling_internal() {
    let error = RotaError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(map_error(error).status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_eyre_report_becomes_database_error() {
    let error: AppError = eyre::eyre!("pool timed out").into();

    assert!(matches!(error.0, RotaError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
