//! Reporting DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MessId};
use domain_billing::{DailyConsumption, StatusFilter};

use super::display_amount;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionQuery {
    /// Restricts the aggregation to one mess
    pub mess_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionResponse {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mess_id: Option<MessId>,
    pub total_amount: Decimal,
    pub currency: Currency,
    pub meal_count: usize,
    pub student_count: usize,
}

impl ConsumptionResponse {
    pub fn new(consumption: DailyConsumption, mess_id: Option<MessId>) -> Self {
        Self {
            date: consumption.date,
            mess_id,
            total_amount: display_amount(&consumption.total_amount),
            currency: consumption.total_amount.currency(),
            meal_count: consumption.meal_count,
            student_count: consumption.student_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    /// Classification day as `YYYY-MM-DD`; defaults to today
    pub as_of: Option<String>,
}
