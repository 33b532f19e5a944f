//! Staff Model (员工)

use serde::{Deserialize, Serialize};

/// Staff member who can be booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: i64,
    /// Display name
    pub name: String,
    /// Inactive staff are excluded from slot generation and booking
    pub is_active: bool,
}

/// Query params for listing staff
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StaffQuery {
    pub is_active: Option<bool>,
}
