//! Logging Infrastructure
//!
//! - Daily rotating application logs (deleted after 14 days)
//! - Permanent audit logs for appointment commits (never deleted)

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Application log retention
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Clean up application log files older than [`APP_LOG_RETENTION_DAYS`]
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = Local::now().date_naive() - Duration::days(APP_LOG_RETENTION_DAYS);
    cleanup_logs_before(log_dir, cutoff)
}

/// Delete `app/app.YYYY-MM-DD` files dated strictly before `cutoff`
///
/// Audit logs are never touched. Returns the number of deleted files.
pub fn cleanup_logs_before(log_dir: &Path, cutoff: NaiveDate) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut deleted = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = app_log_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            deleted += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(deleted)
}

/// `app.2024-03-01` (tracing-appender naming) → date
fn app_log_date(name: &str) -> Option<NaiveDate> {
    let date_part = name
        .strip_prefix("app.")
        .or_else(|| name.strip_prefix("app-"))?;
    let date_part = date_part.strip_suffix(".log").unwrap_or(date_part);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn console_layer<S>(level: &str, json_format: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    }
}

/// Rolling file layer; `audit` selects the audit stream or everything else
fn file_layer<S>(dir: PathBuf, prefix: &str, json_format: bool, audit: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);
    let target_filter =
        tracing_subscriber::filter::filter_fn(move |meta| (meta.target() == "audit") == audit);

    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(appender))
            .with_filter(target_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(appender))
            .with_filter(target_filter)
            .boxed()
    }
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to use JSON format (true for production, false for development)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./work_dir/logs"))
///
/// # Examples
/// ```no_run
/// use front_desk::utils::logger::init_logger_with_file;
///
/// // Production setup (console + file)
/// init_logger_with_file("info", true, Some("./work_dir/logs")).unwrap();
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers = vec![console_layer(level, json_format)];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_log_dir = log_dir.join("app");
        let audit_log_dir = log_dir.join("audit");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&audit_log_dir)?;

        layers.push(file_layer(app_log_dir, "app", json_format, false));
        layers.push(file_layer(audit_log_dir, "audit", json_format, true));

        // 宿主在 tokio 运行时内初始化时才启动清理任务
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(periodic_cleanup(log_dir.to_path_buf()));
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records appointment commits
///
/// Audit logs are permanently stored under `audit/` and never cleaned up.
///
/// # Examples
/// ```ignore
/// audit_log!("book", "appointment:42");
/// audit_log!("cancel", "appointment:42", "front desk override");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            action = %$action,
            resource = %$resource,
            timestamp = chrono::Utc::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            action = %$action,
            resource = %$resource,
            details = %$details,
            timestamp = chrono::Utc::now().to_rfc3339(),
            "AUDIT"
        );
    };
}
