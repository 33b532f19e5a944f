//! 时间工具: 显示时区 (固定偏移) 与 UTC 存储之间的转换
//!
//! 所有日期→时间戳转换统一经过 [`TimeModel`]，
//! 不直接用 UTC 时间戳与本地日历日期比较。

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use shared::models::TimeWindow;

use super::{AppError, AppResult};

/// Display-timezone model
///
/// Offsets are kept to the second; `+05:30` stays `+05:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeModel {
    offset: FixedOffset,
}

impl TimeModel {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// UTC → 本地时间
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc.with_timezone(&self.offset)
    }

    /// 本地时间 (无时区) → UTC
    ///
    /// A fixed offset has no gaps or folds, so every local time maps to
    /// exactly one instant.
    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        local.and_utc() - Duration::seconds(i64::from(self.offset.local_minus_utc()))
    }

    /// 本地日历日期
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }

    /// 日期 + 本地时分 → UTC
    pub fn at_local(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        self.to_utc(date.and_time(time))
    }

    /// 本地日期边界 → `[当日 00:00, 次日 00:00)` 的 UTC 时刻
    ///
    /// 调用方使用 `< end` (不含) 语义。
    pub fn local_day_bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.at_local(date, NaiveTime::MIN);
        (start, start + Duration::days(1))
    }

    pub fn day_window(&self, date: NaiveDate) -> TimeWindow {
        let (start, end) = self.local_day_bounds(date);
        TimeWindow::new(start, end)
    }

    /// 当前本地日期
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_date(now)
    }
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format(format!("Invalid date format: {}", date)))
}

/// 解析 ISO-8601 时间戳 (必须带时区) → UTC
pub fn parse_instant(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::invalid_format(format!("{field} is not a valid ISO-8601 instant: {value}"))
                .with_detail("field", field)
        })
}

/// 解析时区偏移: `+05:30`, `-0300`, `Z`
pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// 解析营业时间字符串 (HH:MM)
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}
