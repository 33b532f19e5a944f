//! Input validation helpers
//!
//! Request payloads arrive with optional fields; these turn them into the
//! concrete values the scheduling engine works with.

use shared::error::ErrorCode;
use shared::models::TimeWindow;

use super::time::parse_instant;
use super::{AppError, AppResult};

/// Validate a required reference id (present and positive).
pub fn require_id(value: Option<i64>, field: &str) -> AppResult<i64> {
    match value {
        None => Err(AppError::required(field)),
        Some(id) if id <= 0 => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be a positive id"),
        )
        .with_detail("field", field)),
        Some(id) => Ok(id),
    }
}

/// Validate the staff selection; the planner and booking both need one.
pub fn require_staff(value: Option<i64>) -> AppResult<i64> {
    match value {
        None => Err(AppError::new(ErrorCode::StaffNotSelected)),
        other => require_id(other, "staffId"),
    }
}

/// Validate a `[startAt, endAt)` pair of ISO-8601 instants.
pub fn require_window(start: Option<&str>, end: Option<&str>) -> AppResult<TimeWindow> {
    let start = start
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::required("startAt"))?;
    let end = end
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::required("endAt"))?;

    let window = TimeWindow::new(parse_instant(start, "startAt")?, parse_instant(end, "endAt")?);
    if window.end <= window.start {
        return Err(AppError::with_message(
            ErrorCode::InvalidTimeWindow,
            format!("endAt ({end}) must be after startAt ({start})"),
        ));
    }
    Ok(window)
}

/// Optional window: both ends present or both absent.
pub fn optional_window(start: Option<&str>, end: Option<&str>) -> AppResult<Option<TimeWindow>> {
    match (start, end) {
        (None, None) => Ok(None),
        (start, end) => require_window(start, end).map(Some),
    }
}
