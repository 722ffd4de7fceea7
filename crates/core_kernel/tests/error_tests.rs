//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::temporal::TemporalError;
use core_kernel::{Currency, YearMonth};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_from_money_error() {
    let money_error = MoneyError::CurrencyMismatch("INR".to_string(), "USD".to_string());
    let core_error: CoreError = money_error.into();

    assert!(matches!(core_error, CoreError::Money(_)));
    assert!(core_error.to_string().contains("INR"));
}

#[test]
fn test_core_error_from_temporal_error() {
    let temporal_error = "2024-13".parse::<YearMonth>().unwrap_err();
    assert_eq!(temporal_error, TemporalError::InvalidMonth("2024-13".to_string()));

    let core_error: CoreError = temporal_error.into();
    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert!(core_error.to_string().contains("2024-13"));
}

#[test]
fn test_unsupported_currency_is_validation_error() {
    let error = "DOGE".parse::<Currency>().unwrap_err();
    assert!(matches!(error, CoreError::Validation(_)));
}
