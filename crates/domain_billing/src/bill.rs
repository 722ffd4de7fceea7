//! Monthly mess bills
//!
//! A [`Bill`] aggregates one student's meals at one mess for one calendar
//! month. Its items are snapshots of the meal records at generation time
//! and never change afterwards; only the payment status and the download
//! counter are mutable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, Currency, MessId, Money, MoneyError, UserId, YearMonth};

use crate::records::{MealRecord, User};

/// Mess name recorded on a bill when the mess directory has no entry
pub const UNKNOWN_MESS_NAME: &str = "Unknown Mess";

/// Payment status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Generated, awaiting payment
    #[default]
    Pending,
    /// Paid in full
    Paid,
}

/// Meal slot of a menu item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
    /// Slot label not known to this system
    #[serde(untagged)]
    Other(String),
}

/// One meal's contribution to a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub date: NaiveDate,
    pub meal_name: String,
    pub meal_type: MealType,
    pub price: Money,
}

impl From<&MealRecord> for BillItem {
    fn from(meal: &MealRecord) -> Self {
        Self {
            date: meal.date,
            meal_name: meal.menu_item_name.clone(),
            meal_type: meal.meal_type.clone(),
            price: meal.price,
        }
    }
}

/// A monthly invoice for one student at one mess
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub student_id: UserId,
    pub student_name: String,
    pub mess_id: MessId,
    pub mess_name: String,
    pub month: YearMonth,
    /// Sum of all item prices
    pub total_amount: Money,
    pub status: BillStatus,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub download_count: u32,
    pub items: Vec<BillItem>,
}

impl Bill {
    /// Builds a pending bill from a student's meals, keeping meal order
    ///
    /// # Arguments
    ///
    /// * `student` - The student being billed
    /// * `mess_id` - Mess the meals were eaten at
    /// * `mess_name` - Display name of the mess
    /// * `month` - Billing month
    /// * `meals` - Meals to bill, in ledger order
    /// * `currency` - Currency of the bill total
    /// * `generated_at` - Generation timestamp
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if a meal is priced in another
    /// currency than `currency`.
    pub fn from_meals<'a, I>(
        student: &User,
        mess_id: MessId,
        mess_name: impl Into<String>,
        month: YearMonth,
        meals: I,
        currency: Currency,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = &'a MealRecord>,
    {
        let items: Vec<BillItem> = meals.into_iter().map(BillItem::from).collect();
        let total_amount = Money::checked_sum(currency, items.iter().map(|item| &item.price))?;

        Ok(Self {
            id: BillId::new_v7(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            mess_id,
            mess_name: mess_name.into(),
            month,
            total_amount,
            status: BillStatus::Pending,
            generated_at,
            download_count: 0,
            items,
        })
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// Returns true if this bill is the one for the given student and month
    pub fn covers(&self, student_id: &UserId, month: YearMonth) -> bool {
        &self.student_id == student_id && self.month == month
    }

    /// Counts one more download of the bill document
    pub fn record_download(&mut self) {
        self.download_count = self.download_count.saturating_add(1);
    }
}
