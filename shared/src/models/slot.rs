//! Slot Model (可预约时段)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` interval in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: touching windows (`a.end == b.start`) do not overlap
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_window(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Bookable, staff-scoped time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// `{staffId}-{startMillis}`; generated, never stored
    pub id: String,
    pub start_iso: DateTime<Utc>,
    pub end_iso: DateTime<Utc>,
    pub staff_ids: Vec<i64>,
}

impl Slot {
    pub fn new(staff_id: i64, window: TimeWindow) -> Self {
        Self {
            id: format!("{}-{}", staff_id, window.start.timestamp_millis()),
            start_iso: window.start,
            end_iso: window.end,
            staff_ids: vec![staff_id],
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_iso, self.end_iso)
    }
}

/// Query params for slot lookup
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    pub staff_id: Option<i64>,
    /// Local date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Appointment being rescheduled; it never blocks itself
    pub exclude_appointment_id: Option<i64>,
    /// Original window of an in-flight reschedule (ISO-8601)
    pub exclude_start: Option<String>,
    pub exclude_end: Option<String>,
}
