//! Front Desk - clinic appointment scheduling and queue engine
//!
//! # 模块结构
//!
//! - [`core`] - 配置、共享状态
//! - [`db`] - SQLite 连接池与仓储
//! - [`scheduling`] - 状态推导、可预约时段、预约提交
//! - [`queue`] - 当日排队看板
//! - [`billing`] - 付款/消费汇总客户端
//! - [`api`] - 宿主后端挂载的 axum 路由
//! - [`utils`] - 时区、日志、校验
//!
//! Library only; the host web backend owns the process and mounts
//! [`api::routes`] with a [`ServerState`].

pub mod api;
pub mod billing;
pub mod core;
pub mod db;
pub mod queue;
pub mod scheduling;
pub mod utils;

pub use crate::core::{Config, ServerState};
pub use crate::utils::TimeModel;
