//! Per-student bill summaries

use serde::Serialize;

use core_kernel::{Currency, Money, MoneyError, UserId};

use crate::bill::Bill;

/// Bill counts and amount for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBillSummary {
    pub total_bills: usize,
    pub paid_bills: usize,
    pub pending_bills: usize,
    pub total_amount: Money,
}

impl StudentBillSummary {
    /// Summarizes the bills of `student_id` among `bills`
    ///
    /// `bills` is usually the bill list of the student's mess; bills of
    /// other students are ignored.
    pub fn from_bills(
        student_id: &UserId,
        bills: &[Bill],
        currency: Currency,
    ) -> Result<Self, MoneyError> {
        let own: Vec<&Bill> = bills.iter().filter(|b| &b.student_id == student_id).collect();

        let total_bills = own.len();
        let paid_bills = own.iter().filter(|b| b.is_paid()).count();
        let total_amount = Money::checked_sum(currency, own.iter().map(|b| &b.total_amount))?;

        Ok(Self {
            total_bills,
            paid_bills,
            pending_bills: total_bills - paid_bills,
            total_amount,
        })
    }
}
