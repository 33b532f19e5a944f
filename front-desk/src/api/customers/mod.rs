//! Customer API 模块 (顾客历史)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{id}/history", get(handler::history))
}
