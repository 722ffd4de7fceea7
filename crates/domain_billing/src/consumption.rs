//! Daily consumption reporting

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use core_kernel::{Currency, Money, MoneyError};

use crate::records::MealRecord;

/// Meals served on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyConsumption {
    pub date: NaiveDate,
    /// Sum of the prices of all meals served that day
    pub total_amount: Money,
    pub meal_count: usize,
    /// Number of distinct users who ate that day
    pub student_count: usize,
}

impl DailyConsumption {
    /// Aggregates the meals recorded exactly on `date`; other dates are ignored
    pub fn from_meals<'a, I>(date: NaiveDate, currency: Currency, meals: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = &'a MealRecord>,
    {
        let day: Vec<&MealRecord> = meals.into_iter().filter(|m| m.date == date).collect();

        let total_amount = Money::checked_sum(currency, day.iter().map(|m| &m.price))?;
        let student_count = day.iter().map(|m| &m.user_id).collect::<HashSet<_>>().len();

        Ok(Self {
            date,
            total_amount,
            meal_count: day.len(),
            student_count,
        })
    }
}
