//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::AppointmentView;

/// GET /api/customers/:id/history - 历史预约 (新→旧)
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    let history = state.booking.history_for_customer(id, Utc::now()).await?;
    Ok(Json(history))
}
