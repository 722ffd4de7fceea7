//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for billing types that give
//! more meaningful error messages than standard assertions.

use core_kernel::{Money, UserId, YearMonth};
use domain_billing::{Bill, BillStatus};
use rust_decimal::Decimal;

/// Asserts that a Money value has the expected amount
///
/// # Panics
///
/// Panics if the amounts differ
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money amount mismatch: actual={}, expected={} {}",
        actual,
        actual.currency().symbol(),
        expected
    );
}

/// Asserts that a bill total equals the sum of its item prices
pub fn assert_bill_total_consistent(bill: &Bill) {
    let sum: Decimal = bill.items.iter().map(|i| i.price.amount()).sum();
    assert_eq!(
        bill.total_amount.amount(),
        sum,
        "Bill {} total {} does not match its items ({} items summing to {})",
        bill.id,
        bill.total_amount,
        bill.items.len(),
        sum
    );
}

/// Asserts that every bill item falls inside the bill's month
pub fn assert_items_within_month(bill: &Bill) {
    for item in &bill.items {
        assert!(
            bill.month.contains(item.date),
            "Bill {} for {} has an item dated {}",
            bill.id,
            bill.month,
            item.date
        );
    }
}

/// Asserts that no student has two bills for the same month
pub fn assert_unique_per_student_month(bills: &[Bill]) {
    let mut seen: Vec<(&UserId, YearMonth)> = Vec::with_capacity(bills.len());
    for bill in bills {
        let key = (&bill.student_id, bill.month);
        assert!(
            !seen.contains(&key),
            "Duplicate bill for student {} in {}",
            bill.student_id,
            bill.month
        );
        seen.push(key);
    }
}

/// Asserts the status of a bill
pub fn assert_bill_status(bill: &Bill, expected: BillStatus) {
    assert_eq!(
        bill.status, expected,
        "Bill {} has status {:?}, expected {:?}",
        bill.id, bill.status, expected
    );
}
