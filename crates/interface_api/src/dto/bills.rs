//! Bill DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MessId, UserId, YearMonth};
use domain_billing::{Bill, BillItem, BillStatus, MealType};

use super::display_amount;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBillsRequest {
    /// Billing month as `YYYY-MM`
    pub month: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BillStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub bill_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub notified: usize,
}

/// Outcome of a mutation addressed by bill id
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillUpdateResponse {
    pub bill_id: String,
    /// False when no bill has this id
    pub updated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemResponse {
    pub date: NaiveDate,
    pub meal_name: String,
    pub meal_type: MealType,
    pub price: Decimal,
}

impl From<BillItem> for BillItemResponse {
    fn from(item: BillItem) -> Self {
        Self {
            date: item.date,
            meal_name: item.meal_name,
            meal_type: item.meal_type,
            price: display_amount(&item.price),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub id: String,
    pub student_id: UserId,
    pub student_name: String,
    pub mess_id: MessId,
    pub mess_name: String,
    pub month: YearMonth,
    pub total_amount: Decimal,
    pub currency: Currency,
    /// Total with currency symbol, e.g. "₹ 150.00"
    pub formatted_total: String,
    pub status: BillStatus,
    pub generated_at: DateTime<Utc>,
    pub download_count: u32,
    pub items: Vec<BillItemResponse>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id.to_string(),
            student_id: bill.student_id,
            student_name: bill.student_name,
            mess_id: bill.mess_id,
            mess_name: bill.mess_name,
            month: bill.month,
            total_amount: display_amount(&bill.total_amount),
            currency: bill.total_amount.currency(),
            formatted_total: bill.total_amount.to_string(),
            status: bill.status,
            generated_at: bill.generated_at,
            download_count: bill.download_count,
            items: bill.items.into_iter().map(BillItemResponse::from).collect(),
        }
    }
}

/// Maps a bill collection to response bodies
pub fn bill_responses(bills: Vec<Bill>) -> Vec<BillResponse> {
    bills.into_iter().map(BillResponse::from).collect()
}
