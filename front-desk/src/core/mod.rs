//! 核心模块 - 配置和状态
//!
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 共享状态

pub mod config;
pub mod state;

pub use config::{ClinicHours, Config};
pub use state::ServerState;
