//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Appointment errors
/// - 2xxx: Staff errors
/// - 3xxx: Customer errors
/// - 4xxx: Billing collaborator errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Appointment errors (1xxx)
    Appointment,
    /// Staff errors (2xxx)
    Staff,
    /// Customer errors (3xxx)
    Customer,
    /// Billing collaborator errors (4xxx)
    Billing,
    /// System errors (5xxx-9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Appointment,
            2000..3000 => Self::Staff,
            3000..4000 => Self::Customer,
            4000..5000 => Self::Billing,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Appointment => "appointment",
            Self::Staff => "staff",
            Self::Customer => "customer",
            Self::Billing => "billing",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1002), ErrorCategory::Appointment);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Billing);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(
            ErrorCode::SlotUnavailable.category(),
            ErrorCategory::Appointment
        );
        assert_eq!(ErrorCode::StaffInactive.category(), ErrorCategory::Staff);
        assert_eq!(
            ErrorCode::CustomerNotFound.category(),
            ErrorCategory::Customer
        );
        assert_eq!(
            ErrorCode::PurchaseSummaryFailed.category(),
            ErrorCategory::Billing
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::General.name(), "general");
        assert_eq!(ErrorCategory::Appointment.name(), "appointment");
        assert_eq!(ErrorCategory::Billing.name(), "billing");
        assert_eq!(ErrorCategory::System.name(), "system");
    }
}
