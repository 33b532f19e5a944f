//! Queue API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::time;
use shared::models::{QueueItem, QueueQuery};

/// GET /api/queue - 本地日期的排队看板 (默认今天)
pub async fn get_queue(
    State(state): State<ServerState>,
    Query(query): Query<QueueQuery>,
) -> AppResult<Json<Vec<QueueItem>>> {
    let now = Utc::now();
    let date = match query.date.as_deref() {
        Some(d) => time::parse_date(d)?,
        None => state.time.today(now),
    };
    let items = state.queue.queue_for_day(date, now).await?;
    Ok(Json(items))
}
