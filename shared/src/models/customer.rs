//! Customer Model (顾客，只读)

use serde::{Deserialize, Serialize};

/// Customer card, owned by the check-in flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Unique lookup key at the front desk
    pub phone: String,
    pub photo_ref: Option<String>,
}

impl Customer {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.trim().is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}
