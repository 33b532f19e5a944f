//! API 路由模块
//!
//! # 结构
//!
//! - [`appointments`] - 预约列表、预约、改期、取消
//! - [`customers`] - 顾客历史预约
//! - [`slots`] - 可预约时段
//! - [`queue`] - 当日排队看板
//! - [`staff`] - 员工列表

pub mod appointments;
pub mod customers;
pub mod queue;
pub mod slots;
pub mod staff;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// All front-desk routes, to be merged into the host backend's router
pub fn routes() -> Router<ServerState> {
    Router::new()
        .merge(appointments::router())
        .merge(customers::router())
        .merge(slots::router())
        .merge(queue::router())
        .merge(staff::router())
}

/// Routes with state and request tracing applied
pub fn build_app(state: ServerState) -> Router {
    routes().layer(TraceLayer::new_for_http()).with_state(state)
}
