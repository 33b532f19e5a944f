//! Slot API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::core::ServerState;
use crate::scheduling::SlotRequest;
use crate::utils::AppResult;
use crate::utils::time;
use crate::utils::validation::optional_window;
use shared::models::{Slot, SlotQuery};

/// GET /api/slots - 员工某日可预约时段
///
/// `date` defaults to today in the display timezone. `excludeStart` and
/// `excludeEnd` describe the original window of an in-flight reschedule.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SlotQuery>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = match query.date.as_deref() {
        Some(d) => time::parse_date(d)?,
        None => state.time.today(Utc::now()),
    };
    let extra = optional_window(query.exclude_start.as_deref(), query.exclude_end.as_deref())?;

    let request = SlotRequest {
        staff_id: query.staff_id,
        date: Some(date),
        exclude_appointment_id: query.exclude_appointment_id,
        extra_excluded_windows: extra.into_iter().collect(),
    };
    let slots = state.planner.available_slots(&request).await?;
    Ok(Json(slots))
}
