use chrono::{FixedOffset, NaiveTime, Offset, Utc};

use crate::utils::time::{parse_clock, parse_offset};

const DEFAULT_TZ_OFFSET: &str = "+05:30";
const DEFAULT_OPEN_TIME: &str = "09:00";
const DEFAULT_CLOSE_TIME: &str = "21:00";
const DEFAULT_SLOT_MINUTES: u32 = 30;

/// Clinic operating hours and slot granularity (local time)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub slot_minutes: u32,
}

impl ClinicHours {
    /// Returns `None` when the hours are empty or the granularity is zero.
    pub fn new(open: NaiveTime, close: NaiveTime, slot_minutes: u32) -> Option<Self> {
        (close > open && slot_minutes > 0).then_some(Self {
            open,
            close,
            slot_minutes,
        })
    }
}

impl Default for ClinicHours {
    fn default() -> Self {
        Self {
            open: parse_clock(DEFAULT_OPEN_TIME).unwrap_or(NaiveTime::MIN),
            close: parse_clock(DEFAULT_CLOSE_TIME).unwrap_or(NaiveTime::MIN),
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

/// 前台配置 - 排班引擎的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、日志) |
/// | DATABASE_PATH | {WORK_DIR}/front-desk.db | SQLite 文件 |
/// | BILLING_SERVICE_URL | http://localhost:8090 | 付款/消费汇总服务地址 |
/// | DISPLAY_TZ_OFFSET | +05:30 | 显示时区 (固定偏移) |
/// | CLINIC_OPEN_TIME | 09:00 | 营业开始 (本地) |
/// | CLINIC_CLOSE_TIME | 21:00 | 营业结束 (本地) |
/// | SLOT_MINUTES | 30 | 时段粒度 (分钟) |
/// | REQUEST_TIMEOUT_MS | 10000 | 外部服务请求超时 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
///
/// 非法值回退到默认值并记录 warn 日志。
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// SQLite 数据库路径
    pub database_path: String,
    /// 付款/消费汇总服务 URL
    pub billing_service_url: String,
    /// 显示时区偏移
    pub display_offset: FixedOffset,
    /// 营业时间与时段粒度
    pub clinic_hours: ClinicHours,
    /// 外部请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置 (测试时传入固定映射)
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let work_dir = var("WORK_DIR").unwrap_or_else(|| "./work_dir".into());
        let database_path =
            var("DATABASE_PATH").unwrap_or_else(|| format!("{work_dir}/front-desk.db"));

        let display_offset = var("DISPLAY_TZ_OFFSET")
            .and_then(|raw| {
                let parsed = parse_offset(&raw);
                if parsed.is_none() {
                    tracing::warn!(value = %raw, "Invalid DISPLAY_TZ_OFFSET, falling back to {DEFAULT_TZ_OFFSET}");
                }
                parsed
            })
            .unwrap_or_else(default_offset);

        Self {
            database_path,
            billing_service_url: var("BILLING_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:8090".into()),
            display_offset,
            clinic_hours: clinic_hours_from(&var),
            request_timeout_ms: var("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            work_dir,
        }
    }

    /// 日志目录
    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn default_offset() -> FixedOffset {
    parse_offset(DEFAULT_TZ_OFFSET).unwrap_or_else(|| Utc.fix())
}

fn clinic_hours_from(var: &impl Fn(&str) -> Option<String>) -> ClinicHours {
    let open = var("CLINIC_OPEN_TIME").unwrap_or_else(|| DEFAULT_OPEN_TIME.into());
    let close = var("CLINIC_CLOSE_TIME").unwrap_or_else(|| DEFAULT_CLOSE_TIME.into());
    let slot_minutes = var("SLOT_MINUTES").unwrap_or_else(|| DEFAULT_SLOT_MINUTES.to_string());

    let hours = match (parse_clock(&open), parse_clock(&close), slot_minutes.parse::<u32>()) {
        (Some(open), Some(close), Ok(minutes)) => ClinicHours::new(open, close, minutes),
        _ => None,
    };

    hours.unwrap_or_else(|| {
        tracing::warn!(
            open = %open,
            close = %close,
            slot_minutes = %slot_minutes,
            "Invalid clinic hours, falling back to {DEFAULT_OPEN_TIME}-{DEFAULT_CLOSE_TIME} / {DEFAULT_SLOT_MINUTES}min"
        );
        ClinicHours::default()
    })
}
