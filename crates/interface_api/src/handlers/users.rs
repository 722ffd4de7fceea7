//! User handlers

use axum::{extract::{Path, State}, Json};

use core_kernel::UserId;

use crate::{AppState, error::ApiError};
use crate::dto::bills::{bill_responses, BillResponse};

/// Lists the bills of a student
pub async fn user_bills(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let bills = state.engine.get_user_bills(&UserId::new(id)).await?;
    Ok(Json(bill_responses(bills)))
}
