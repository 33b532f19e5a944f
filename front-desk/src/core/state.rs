use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::billing::{BillingSummary, HttpBillingClient};
use crate::core::Config;
use crate::db::DbService;
use crate::queue::QueueAggregator;
use crate::scheduling::{BookingService, SlotPlanner};
use crate::utils::{AppResult, TimeModel};

/// 服务器状态 - 持有排班引擎各组件的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 预约存储 |
/// | time | TimeModel | 显示时区 |
/// | planner | Arc<SlotPlanner> | 时段计算 (只读) |
/// | booking | Arc<BookingService> | 唯一写入方 |
/// | queue | Arc<QueueAggregator> | 排队看板 |
///
/// Clone 只复制 Arc，宿主后端可直接作为 axum state 使用。
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub time: TimeModel,
    pub planner: Arc<SlotPlanner>,
    pub booking: Arc<BookingService>,
    pub queue: Arc<QueueAggregator>,
}

impl ServerState {
    /// 用已有连接池和计费客户端构造 (测试注入桩实现)
    pub fn new(config: Config, pool: SqlitePool, billing: Arc<dyn BillingSummary>) -> Self {
        let time = TimeModel::new(config.display_offset);
        Self {
            planner: Arc::new(SlotPlanner::new(pool.clone(), time, config.clinic_hours)),
            booking: Arc::new(BookingService::new(pool.clone(), time)),
            queue: Arc::new(QueueAggregator::new(pool.clone(), time, billing)),
            time,
            pool,
            config,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 数据库 (DATABASE_PATH, WAL + migrations)
    /// 2. 计费服务 HTTP 客户端
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        let billing = HttpBillingClient::new(
            &config.billing_service_url,
            Duration::from_millis(config.request_timeout_ms),
        )?;

        tracing::info!(
            offset = %config.display_offset,
            open = %config.clinic_hours.open,
            close = %config.clinic_hours.close,
            slot_minutes = config.clinic_hours.slot_minutes,
            billing = %billing.base_url(),
            "Front desk state initialized"
        );
        Ok(Self::new(config.clone(), db.pool, Arc::new(billing)))
    }
}
