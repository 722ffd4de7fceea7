//! Consumption handlers

use axum::{extract::{Path, Query, State}, Json};

use core_kernel::MessId;

use super::parse_date;
use crate::{AppState, error::ApiError};
use crate::dto::reports::{ConsumptionQuery, ConsumptionResponse};

/// Meals served on a day, across all messes or for `?messId=`
pub async fn daily_consumption(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<ConsumptionQuery>,
) -> Result<Json<ConsumptionResponse>, ApiError> {
    let date = parse_date(&date)?;

    let response = match query.mess_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            let mess_id = MessId::new(id);
            let consumption = state.engine.get_mess_daily_consumption(&mess_id, date).await?;
            ConsumptionResponse::new(consumption, Some(mess_id))
        }
        None => {
            let consumption = state.engine.get_daily_consumption(date).await?;
            ConsumptionResponse::new(consumption, None)
        }
    };
    Ok(Json(response))
}
