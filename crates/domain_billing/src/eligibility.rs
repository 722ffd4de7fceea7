//! Enrollment-gated billing eligibility
//!
//! Billing starts with the calendar month after the enrollment month. The
//! same predicate decides whether a month may be billed and whether a
//! student counts as billing-active on a given day, so generation and
//! enrollment tracking can never disagree.

use chrono::NaiveDate;

use core_kernel::YearMonth;

/// First billable month for a student enrolled on `enrollment_date`
///
/// Returns `None` only when the following month lies outside the calendar.
pub fn billing_start_month(enrollment_date: NaiveDate) -> Option<YearMonth> {
    YearMonth::from_date(enrollment_date).next()
}

/// Returns true if `month` may be billed for a student with the given
/// enrollment date. No enrollment date means no gate.
pub fn is_billable_for(enrollment_date: Option<NaiveDate>, month: YearMonth) -> bool {
    match enrollment_date {
        None => true,
        Some(date) => billing_start_month(date).is_some_and(|start| month >= start),
    }
}

/// Returns true if billing has started for the student as of `as_of`
pub fn is_billing_active(enrollment_date: Option<NaiveDate>, as_of: NaiveDate) -> bool {
    is_billable_for(enrollment_date, YearMonth::from_date(as_of))
}
