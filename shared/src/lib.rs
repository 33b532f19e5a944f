//! Shared types for the clinic front desk
//!
//! Wire types used by both the front-desk core and the receptionist UI:
//! error codes, response envelopes, appointment/staff/customer models,
//! slots and queue items.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
