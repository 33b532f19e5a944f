//! Data models
//!
//! Shared between the front-desk core and the receptionist UI (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-generated).

pub mod appointment;
pub mod customer;
pub mod queue;
pub mod slot;
pub mod staff;

// Re-exports
pub use appointment::*;
pub use customer::*;
pub use queue::*;
pub use slot::*;
pub use staff::*;
