//! Staff API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::db::repository::staff;
use crate::utils::AppResult;
use shared::models::{Staff, StaffQuery};

/// GET /api/staff - 员工列表 (`isActive=true` 仅在职)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<StaffQuery>,
) -> AppResult<Json<Vec<Staff>>> {
    let staff = staff::find_all(&state.pool, query.is_active).await?;
    Ok(Json(staff))
}
