//! Staff API 模块 (员工)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/staff", get(handler::list))
}
