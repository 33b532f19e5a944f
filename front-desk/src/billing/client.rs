// front-desk/src/billing/client.rs
// 付款/消费汇总 HTTP 客户端

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::error::ErrorCode;

use super::{BillingSummary, to_decimal};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentSummary {
    total_paid: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseSummary {
    total_purchased: f64,
}

/// reqwest client for the billing service
#[derive(Debug, Clone)]
pub struct HttpBillingClient {
    client: Client,
    base_url: String,
}

impl HttpBillingClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build billing client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_summary<T: DeserializeOwned>(
        &self,
        path: &str,
        customer_id: i64,
        code: ErrorCode,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        let fail = |reason: String| {
            AppError::with_message(code, format!("{}: {reason}", code.message()))
                .with_detail("customerId", customer_id)
        };

        let response = self
            .client
            .get(&url)
            .query(&[("customerId", customer_id)])
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(fail(format!("HTTP {status}: {text}")));
        }
        response.json::<T>().await.map_err(|e| fail(e.to_string()))
    }
}

#[async_trait]
impl BillingSummary for HttpBillingClient {
    async fn total_paid(&self, customer_id: i64) -> AppResult<Decimal> {
        let summary: PaymentSummary = self
            .get_summary("payments/summary", customer_id, ErrorCode::PaymentSummaryFailed)
            .await?;
        Ok(to_decimal(summary.total_paid))
    }

    async fn total_purchased(&self, customer_id: i64) -> AppResult<Decimal> {
        let summary: PurchaseSummary = self
            .get_summary("purchase/summary", customer_id, ErrorCode::PurchaseSummaryFailed)
            .await?;
        Ok(to_decimal(summary.total_purchased))
    }
}
