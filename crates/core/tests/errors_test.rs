use std::error::Error;
use classrota_core::errors::{RotaError, RotaResult};

#[test]
fn test_rota_error_display() {
    let not_found = RotaError::NotFound("Time slot not found".to_string());
    let validation = RotaError::Validation("Invalid input".to_string());
    let transition = RotaError::InvalidTransition("already accepted".to_string());
    let database = RotaError::Database(eyre::eyre!("Database connection failed"));
    let internal = RotaError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Time slot not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        transition.to_string(),
        "Invalid status transition: already accepted"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let rota_error = RotaError::Internal(Box::new(io_error));

    assert!(rota_error.source().is_some());
}

#[test]
fn test_rota_result() {
    let result: RotaResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: RotaResult<i32> = Err(RotaError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_eyre_conversion_with_question_mark() {
    fn failing() -> RotaResult<()> {
        let report: eyre::Result<()> = Err(eyre::eyre!("connection reset"));
        report?;
        Ok(())
    }

    let err = failing().unwrap_err();
    assert!(matches!(err, RotaError::Database(_)));
    assert!(err.to_string().contains("connection reset"));
}
