//! Appointment Model (预约)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::queue::DisplayStatus;
use super::slot::TimeWindow;

/// Manually maintained appointment status
///
/// Only `CANCELLED` is authoritative; every other value is informational and
/// the displayed status is derived from wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            "NO_SHOW" => Ok(Self::NoShow),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// How the appointment entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AppointmentType {
    /// Arrived without a pre-assigned time
    #[serde(rename = "WALKIN")]
    Walkin,
    /// Scheduled `startAt` set at creation time
    #[default]
    #[serde(rename = "PREBOOKING")]
    Prebooking,
}

impl AppointmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walkin => "WALKIN",
            Self::Prebooking => "PREBOOKING",
        }
    }
}

impl std::str::FromStr for AppointmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WALKIN" => Ok(Self::Walkin),
            "PREBOOKING" => Ok(Self::Prebooking),
            other => Err(format!("unknown appointment type: {other}")),
        }
    }
}

/// Appointment record
///
/// Instants are UTC. `start_at`/`end_at` are null for an unscheduled walk-in;
/// a started walk-in may have `start_at` without `end_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub staff_id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    pub appointment_type: AppointmentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// Scheduled `[start, end)` window, if both ends are set
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }

    /// Whether this appointment occupies its staff member's time
    ///
    /// Only non-cancelled appointments with a full window take part in
    /// double-booking checks.
    pub fn blocks_schedule(&self) -> bool {
        !self.is_cancelled() && self.window().is_some()
    }

    /// Instant used to place the appointment on a queue day
    ///
    /// Walk-ins without a start time fall back to their creation instant.
    /// Pre-bookings always carry `start_at`; the fallback only guards legacy rows.
    pub fn bucket_instant(&self) -> DateTime<Utc> {
        self.start_at.unwrap_or(self.created_at)
    }
}

/// Appointment with its derived display status (read views)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub display_status: DisplayStatus,
}

/// Create appointment payload
///
/// `PREBOOKING` requires `start_at`/`end_at` (ISO-8601). `WALKIN` ignores them
/// and queues the customer by arrival time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCreate {
    pub staff_id: Option<i64>,
    pub service_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    #[serde(default)]
    pub appointment_type: AppointmentType,
}

/// Reschedule payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentReschedule {
    /// New staff member (keeps current staff when absent)
    pub staff_id: Option<i64>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

/// Result of a reschedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rescheduled {
    pub appointment: Appointment,
    /// Local day (YYYY-MM-DD) the appointment left, when it changed day
    pub moved_from: Option<chrono::NaiveDate>,
}

/// Query params for listing appointments
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub staff_id: Option<i64>,
    pub customer_id: Option<i64>,
    /// Local date (YYYY-MM-DD), inclusive
    pub start_date: Option<String>,
    /// Local date (YYYY-MM-DD), inclusive
    pub end_date: Option<String>,
}
