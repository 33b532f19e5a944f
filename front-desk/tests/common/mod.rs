//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use front_desk::billing::{BillingSummary, to_decimal};
use front_desk::core::Config;
use front_desk::db::DbService;
use front_desk::utils::time::parse_offset;
use front_desk::utils::{AppError, AppResult, ErrorCode, TimeModel};
use rust_decimal::Decimal;
use shared::models::TimeWindow;
use sqlx::SqlitePool;

pub fn ist() -> TimeModel {
    TimeModel::new(parse_offset("+05:30").unwrap())
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Local (+05:30) wall-clock time on `date`
pub fn local(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    ist().at_local(date, NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

pub fn window(date: NaiveDate, h: u32, m: u32, minutes: i64) -> TimeWindow {
    let start = local(date, h, m);
    TimeWindow::new(start, start + Duration::minutes(minutes))
}

/// Defaults only (no environment lookups)
pub fn test_config() -> Config {
    Config::from_vars(|_| None)
}

pub async fn memory_pool() -> SqlitePool {
    DbService::in_memory().await.unwrap().pool
}

pub async fn seed_staff(pool: &SqlitePool, id: i64, name: &str, is_active: bool) {
    sqlx::query("INSERT INTO staff (id, name, is_active) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(is_active)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_customer(pool: &SqlitePool, id: i64, first_name: &str) {
    sqlx::query("INSERT INTO customer (id, first_name, phone) VALUES (?, ?, ?)")
        .bind(id)
        .bind(first_name)
        .bind(format!("98000{id:05}"))
        .execute(pool)
        .await
        .unwrap();
}

/// Two active staff (1, 2), one inactive (3), customers 101..=105
pub async fn seed_clinic(pool: &SqlitePool) {
    seed_staff(pool, 1, "Priya", true).await;
    seed_staff(pool, 2, "Arjun", true).await;
    seed_staff(pool, 3, "Meera", false).await;
    for (id, name) in [(101, "Asha"), (102, "Ravi"), (103, "Kiran"), (104, "Devi"), (105, "Sunil")] {
        seed_customer(pool, id, name).await;
    }
}

/// In-memory billing collaborator
#[derive(Debug, Default)]
pub struct StubBilling {
    /// customer → (paid, purchased)
    pub totals: HashMap<i64, (f64, f64)>,
    pub failing_payments: HashSet<i64>,
    pub failing_purchases: HashSet<i64>,
}

impl StubBilling {
    pub fn with(totals: &[(i64, f64, f64)]) -> Self {
        Self {
            totals: totals
                .iter()
                .map(|(id, paid, purchased)| (*id, (*paid, *purchased)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn shared(self) -> Arc<dyn BillingSummary> {
        Arc::new(self)
    }
}

#[async_trait]
impl BillingSummary for StubBilling {
    async fn total_paid(&self, customer_id: i64) -> AppResult<Decimal> {
        if self.failing_payments.contains(&customer_id) {
            return Err(AppError::new(ErrorCode::PaymentSummaryFailed));
        }
        Ok(to_decimal(self.totals.get(&customer_id).map(|t| t.0).unwrap_or_default()))
    }

    async fn total_purchased(&self, customer_id: i64) -> AppResult<Decimal> {
        if self.failing_purchases.contains(&customer_id) {
            return Err(AppError::new(ErrorCode::PurchaseSummaryFailed));
        }
        Ok(to_decimal(self.totals.get(&customer_id).map(|t| t.1).unwrap_or_default()))
    }
}
