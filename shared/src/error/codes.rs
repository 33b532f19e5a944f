//! Unified error codes for the clinic front desk
//!
//! This module defines all error codes returned by the front-desk core and
//! understood by the receptionist UI. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Appointment errors
//! - 2xxx: Staff errors
//! - 3xxx: Customer errors
//! - 4xxx: Billing collaborator errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Appointment ====================
    /// Appointment not found
    AppointmentNotFound = 1001,
    /// The requested window is no longer free for this staff member
    SlotUnavailable = 1002,
    /// Appointment has been cancelled
    AppointmentCancelled = 1003,
    /// endAt is not after startAt
    InvalidTimeWindow = 1004,
    /// Window crosses a local day boundary
    WindowSpansDays = 1005,

    // ==================== 2xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 2001,
    /// Staff member is inactive
    StaffInactive = 2002,
    /// No staff member selected
    StaffNotSelected = 2003,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,

    // ==================== 4xxx: Billing ====================
    /// Payment summary lookup failed
    PaymentSummaryFailed = 4001,
    /// Purchase summary lookup failed
    PurchaseSummaryFailed = 4002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Appointment
            ErrorCode::AppointmentNotFound => "Appointment not found",
            ErrorCode::SlotUnavailable => "Selected time is no longer available, please pick another time",
            ErrorCode::AppointmentCancelled => "Appointment has been cancelled",
            ErrorCode::InvalidTimeWindow => "End time must be after start time",
            ErrorCode::WindowSpansDays => "Appointment must start and end on the same day",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffInactive => "Staff member is inactive",
            ErrorCode::StaffNotSelected => "Please select a staff member first",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",

            // Billing
            ErrorCode::PaymentSummaryFailed => "Payment summary unavailable",
            ErrorCode::PurchaseSummaryFailed => "Purchase summary unavailable",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Appointment
            1001 => Ok(ErrorCode::AppointmentNotFound),
            1002 => Ok(ErrorCode::SlotUnavailable),
            1003 => Ok(ErrorCode::AppointmentCancelled),
            1004 => Ok(ErrorCode::InvalidTimeWindow),
            1005 => Ok(ErrorCode::WindowSpansDays),

            // Staff
            2001 => Ok(ErrorCode::StaffNotFound),
            2002 => Ok(ErrorCode::StaffInactive),
            2003 => Ok(ErrorCode::StaffNotSelected),

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),

            // Billing
            4001 => Ok(ErrorCode::PaymentSummaryFailed),
            4002 => Ok(ErrorCode::PurchaseSummaryFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
