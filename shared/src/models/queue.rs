//! Queue Model (排队看板)

use serde::{Deserialize, Serialize};

use super::appointment::AppointmentView;
use super::customer::Customer;

/// Status shown on the receptionist dashboard
///
/// Derived from wall-clock time on every read; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayStatus {
    #[serde(rename = "Waiting")]
    Waiting,
    #[serde(rename = "In Exercise")]
    InExercise,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl DisplayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::InExercise => "In Exercise",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// One customer's view of the selected day (derived, not persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub customer_id: i64,
    /// Customer card when the customer record is known
    pub customer: Option<Customer>,
    /// All of the customer's appointments on the day, by bucketing instant
    pub appointments: Vec<AppointmentView>,
    pub queue_status: DisplayStatus,
    /// Appointment whose status was chosen as `queue_status`
    pub active_appointment_id: Option<i64>,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    /// Amounts defaulted to zero because a billing summary failed
    #[serde(default)]
    pub billing_unavailable: bool,
}

/// Query params for the queue dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueQuery {
    /// Local date (YYYY-MM-DD); defaults to today in the display timezone
    pub date: Option<String>,
}
