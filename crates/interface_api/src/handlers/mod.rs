//! Request handlers

pub mod health;
pub mod bills;
pub mod messes;
pub mod users;
pub mod consumption;

use chrono::NaiveDate;
use core_kernel::BillId;

use crate::error::ApiError;

/// Parses a bill id from a path or body, with or without the `BILL-` prefix
pub(crate) fn parse_bill_id(raw: &str) -> Result<BillId, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid bill id '{}'", raw)))
}

/// Parses a `YYYY-MM-DD` calendar date from a path or query
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_plain_dates_only() {
        assert_eq!(
            parse_date(" 2024-04-02 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
        );
        assert!(matches!(parse_date("2024-04-02T00:00:00Z"), Err(ApiError::Validation(_))));
        assert!(parse_date("2024-4-31").is_err());
    }
}
