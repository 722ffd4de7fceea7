//! Mess handlers

use axum::{extract::{Path, Query, State}, Json};
use chrono::Utc;

use core_kernel::MessId;
use domain_billing::{EnrollmentReport, StudentFilter};

use super::parse_date;
use crate::{AppState, error::ApiError};
use crate::dto::bills::{bill_responses, BillResponse};
use crate::dto::reports::EnrollmentQuery;

/// Lists the bills of a mess
pub async fn mess_bills(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let bills = state.engine.get_mess_bills(&MessId::new(id)).await?;
    Ok(Json(bill_responses(bills)))
}

/// Enrollment overview and student rows of a mess
pub async fn enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<EnrollmentQuery>,
) -> Result<Json<EnrollmentReport>, ApiError> {
    let as_of = match query.as_of.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let filter = StudentFilter {
        search: query.search,
        status: query.status,
    };

    let report = state
        .engine
        .enrollment_report(&MessId::new(id), as_of, &filter)
        .await?;
    Ok(Json(report))
}
