//! Billing collaborators (付款/消费汇总)
//!
//! Payment and purchase records live in another service; the queue only
//! needs per-customer totals. Amounts are computed as `Decimal` and exposed
//! as `f64` rounded to 2 places.

pub mod client;

use async_trait::async_trait;
use rust_decimal::prelude::*;

use crate::utils::AppResult;

pub use client::HttpBillingClient;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Per-customer payment/purchase totals
#[async_trait]
pub trait BillingSummary: Send + Sync {
    /// Total paid by the customer (`GET /payments/summary`)
    async fn total_paid(&self, customer_id: i64) -> AppResult<Decimal>;

    /// Total purchased by the customer (`GET /purchase/summary`)
    async fn total_purchased(&self, customer_id: i64) -> AppResult<Decimal>;
}

/// Convert a wire amount to Decimal; non-finite values become zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite amount from billing, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Outstanding balance, never negative (overpayment is not a credit here)
pub fn pending_amount(total_purchased: Decimal, total_paid: Decimal) -> Decimal {
    (total_purchased - total_paid).max(Decimal::ZERO)
}
