//! Slot API 模块 (可预约时段)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/slots", get(handler::list))
}
