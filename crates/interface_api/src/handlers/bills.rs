//! Bill handlers

use axum::{extract::{Path, State}, Json};

use core_kernel::{BillId, YearMonth};
use domain_billing::GenerationReport;

use crate::{AppState, error::ApiError};
use crate::dto::bills::*;
use crate::handlers::parse_bill_id;

/// Generates the bills of a month (admin)
pub async fn generate_bills(
    State(state): State<AppState>,
    Json(request): Json<GenerateBillsRequest>,
) -> Result<Json<GenerationReport>, ApiError> {
    let month: YearMonth = request.month.parse()?;
    let report = state.engine.generate_bills_for_month(month).await?;
    Ok(Json(report))
}

/// Lists all bills
pub async fn list_bills(
    State(state): State<AppState>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let bills = state.engine.get_all_bills().await?;
    Ok(Json(bill_responses(bills)))
}

/// Gets a bill by ID
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill_id = parse_bill_id(&id)?;
    let bill = state
        .engine
        .get_bill(bill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill {} not found", bill_id)))?;
    Ok(Json(bill.into()))
}

/// Updates bill status (admin)
///
/// An unknown id is not an error; the response reports `updated: false`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<BillUpdateResponse>, ApiError> {
    let bill_id = parse_bill_id(&id)?;
    let updated = state.engine.update_bill_status(bill_id, request.status).await?;
    Ok(Json(BillUpdateResponse {
        bill_id: bill_id.to_string(),
        updated,
    }))
}

/// Counts a download of the bill document
pub async fn record_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BillUpdateResponse>, ApiError> {
    let bill_id = parse_bill_id(&id)?;
    let updated = state.engine.record_bill_download(bill_id).await?;
    Ok(Json(BillUpdateResponse {
        bill_id: bill_id.to_string(),
        updated,
    }))
}

/// Sends bill notifications (admin)
pub async fn send_notifications(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, ApiError> {
    let bill_ids = request
        .bill_ids
        .iter()
        .map(|id| parse_bill_id(id))
        .collect::<Result<Vec<BillId>, _>>()?;

    state.engine.send_bill_notifications(&bill_ids).await?;
    Ok(Json(NotifyResponse {
        notified: bill_ids.len(),
    }))
}
