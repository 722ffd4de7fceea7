//! Monthly bill generation
//!
//! [`generate_month`] is the pure core of bill generation: given the
//! directory snapshots and the current bill collection it appends the new
//! bills in place and reports what happened to every student it
//! considered. The engine wraps it with loading, locking and a single save.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use core_kernel::{BillId, Currency, MessId, Money, MoneyError, UserId, YearMonth};

use crate::bill::{Bill, UNKNOWN_MESS_NAME};
use crate::eligibility::{billing_start_month, is_billable_for};
use crate::records::{MealRecord, User};

/// What generation did for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GenerationOutcome {
    /// A new bill was created
    Generated {
        bill_id: BillId,
        total_amount: Money,
        item_count: usize,
    },
    /// The month lies before the student's first billable month
    SkippedIneligible {
        billing_starts: Option<YearMonth>,
    },
    /// A bill for this student and month already exists
    SkippedAlreadyBilled {
        bill_id: BillId,
    },
    /// No meals at the student's mess in this month
    SkippedNoMeals,
}

impl GenerationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentOutcome {
    pub student_id: UserId,
    pub student_name: String,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// Per-student result of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub month: YearMonth,
    pub outcomes: Vec<StudentOutcome>,
}

impl GenerationReport {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, student: &User, outcome: GenerationOutcome) {
        debug!(student = %student.id, month = %self.month, ?outcome, "Bill generation outcome");
        self.outcomes.push(StudentOutcome {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            outcome,
        });
    }

    pub fn generated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_generated()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.generated_count()
    }

    /// Ids of the bills created by this run, in generation order
    pub fn generated_bill_ids(&self) -> Vec<BillId> {
        self.outcomes
            .iter()
            .filter_map(|o| match o.outcome {
                GenerationOutcome::Generated { bill_id, .. } => Some(bill_id),
                _ => None,
            })
            .collect()
    }

    /// Outcome for a given student, if they were considered
    pub fn outcome_for(&self, student_id: &UserId) -> Option<&GenerationOutcome> {
        self.outcomes
            .iter()
            .find(|o| &o.student_id == student_id)
            .map(|o| &o.outcome)
    }
}

/// Generates the bills of `month` into `bills`
///
/// Considers every student with a mess selected. A student is skipped when
/// the month is before their billing start, when a bill for the month
/// already exists, or when they ate no meals at their current mess that
/// month. Meals recorded at any other mess are ignored.
///
/// # Arguments
///
/// * `month` - Month to bill
/// * `users` - All users from the user directory
/// * `meals` - All meal records from the meal ledger
/// * `bills` - Current bill collection; new bills are appended
/// * `mess_name` - Mess name lookup; `None` falls back to "Unknown Mess"
/// * `currency` - Currency of bill totals
/// * `generated_at` - Timestamp stamped on new bills
///
/// # Errors
///
/// Returns `MoneyError` if a student's meals cannot be summed. `bills` may
/// then already hold some new bills, so callers must discard it.
pub fn generate_month<F>(
    month: YearMonth,
    users: &[User],
    meals: &[MealRecord],
    bills: &mut Vec<Bill>,
    mess_name: F,
    currency: Currency,
    generated_at: DateTime<Utc>,
) -> Result<GenerationReport, MoneyError>
where
    F: Fn(&MessId) -> Option<String>,
{
    let mut report = GenerationReport::new(month);

    for student in users.iter().filter(|u| u.is_billable_student()) {
        let Some(mess_id) = student.mess() else {
            continue;
        };

        if !is_billable_for(student.enrollment_date, month) {
            let billing_starts = student.enrollment_date.and_then(billing_start_month);
            report.record(student, GenerationOutcome::SkippedIneligible { billing_starts });
            continue;
        }

        if let Some(existing) = bills.iter().find(|b| b.covers(&student.id, month)) {
            let bill_id = existing.id;
            report.record(student, GenerationOutcome::SkippedAlreadyBilled { bill_id });
            continue;
        }

        let student_meals: Vec<&MealRecord> = meals
            .iter()
            .filter(|meal| {
                meal.user_id == student.id
                    && month.contains(meal.date)
                    && &meal.mess_id == mess_id
            })
            .collect();

        if student_meals.is_empty() {
            report.record(student, GenerationOutcome::SkippedNoMeals);
            continue;
        }

        let name = mess_name(mess_id).unwrap_or_else(|| UNKNOWN_MESS_NAME.to_string());
        let bill = Bill::from_meals(
            student,
            mess_id.clone(),
            name,
            month,
            student_meals,
            currency,
            generated_at,
        )?;

        report.record(
            student,
            GenerationOutcome::Generated {
                bill_id: bill.id,
                total_amount: bill.total_amount,
                item_count: bill.items.len(),
            },
        );
        bills.push(bill);
    }

    Ok(report)
}
