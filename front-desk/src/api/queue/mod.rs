//! Queue API 模块 (排队看板)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/queue", get(handler::get_queue))
}
