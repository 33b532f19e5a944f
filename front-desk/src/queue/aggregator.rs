//! Queue Aggregator
//!
//! Recomputed on every fetch; nothing here is persisted.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use shared::models::{Appointment, DisplayStatus, QueueItem};
use sqlx::SqlitePool;

use crate::billing::{BillingSummary, pending_amount, to_f64};
use crate::db::repository::{appointment, customer};
use crate::scheduling::{derive_status, with_status};
use crate::utils::{AppResult, TimeModel};

pub struct QueueAggregator {
    pool: SqlitePool,
    time: TimeModel,
    billing: Arc<dyn BillingSummary>,
}

impl std::fmt::Debug for QueueAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueAggregator")
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

/// Billing totals for one customer
struct Totals {
    paid: Decimal,
    purchased: Decimal,
    unavailable: bool,
}

impl QueueAggregator {
    pub fn new(pool: SqlitePool, time: TimeModel, billing: Arc<dyn BillingSummary>) -> Self {
        Self {
            pool,
            time,
            billing,
        }
    }

    /// Queue for a local day
    ///
    /// Appointments are placed on the day of their bucketing instant
    /// (`start_at`, or `created_at` for unscheduled walk-ins) in the display
    /// timezone. One item per customer, ordered by the customer's earliest
    /// appointment.
    pub async fn queue_for_day(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<QueueItem>> {
        let (day_start, day_end) = self.time.local_day_bounds(date);
        let fetched = appointment::find_overlapping_day(
            &self.pool,
            day_start.timestamp_millis(),
            day_end.timestamp_millis(),
        )
        .await?;

        let mut groups: BTreeMap<i64, Vec<Appointment>> = BTreeMap::new();
        for appt in fetched {
            if self.time.local_date(appt.bucket_instant()) == date {
                groups.entry(appt.customer_id).or_default().push(appt);
            }
        }

        let mut groups: Vec<(i64, Vec<Appointment>)> = groups.into_iter().collect();
        for (_, appts) in groups.iter_mut() {
            appts.sort_by_key(|a| (a.bucket_instant(), a.id));
        }
        groups.sort_by_key(|(customer_id, appts)| {
            (appts.first().map(Appointment::bucket_instant), *customer_id)
        });

        // No locks are held here; booking commits are never blocked by billing calls
        let totals = join_all(groups.iter().map(|(id, _)| self.totals_for(*id))).await;

        let mut items = Vec::with_capacity(groups.len());
        for ((customer_id, appts), totals) in groups.into_iter().zip(totals) {
            let card = customer::find_by_id(&self.pool, customer_id).await?;
            let (queue_status, active_appointment_id) = queue_status(&appts, now);

            items.push(QueueItem {
                customer_id,
                customer: card,
                appointments: appts.into_iter().map(|a| with_status(a, now)).collect(),
                queue_status,
                active_appointment_id,
                total_amount: to_f64(totals.purchased),
                paid_amount: to_f64(totals.paid),
                pending_amount: to_f64(pending_amount(totals.purchased, totals.paid)),
                billing_unavailable: totals.unavailable,
            });
        }

        tracing::debug!(%date, customers = items.len(), "Queue aggregated");
        Ok(items)
    }

    /// Both summaries for one customer; any failure zeroes the amounts
    async fn totals_for(&self, customer_id: i64) -> Totals {
        let (paid, purchased) = futures::join!(
            self.billing.total_paid(customer_id),
            self.billing.total_purchased(customer_id)
        );

        match (paid, purchased) {
            (Ok(paid), Ok(purchased)) => Totals {
                paid,
                purchased,
                unavailable: false,
            },
            (paid, purchased) => {
                for err in [paid.err(), purchased.err()].into_iter().flatten() {
                    tracing::warn!(
                        customer_id,
                        code = %err.code,
                        error = %err,
                        "Billing summary unavailable, defaulting amounts to zero"
                    );
                }
                Totals {
                    paid: Decimal::ZERO,
                    purchased: Decimal::ZERO,
                    unavailable: true,
                }
            }
        }
    }
}

/// Queue status of one customer's appointments on a day
///
/// Cancelled appointments are skipped while any sibling is live. Among the
/// live ones: In Exercise first, else the soonest Waiting, else the most
/// recent Completed. A group of only cancelled appointments is Cancelled.
/// Returns the status and the appointment it came from.
pub fn queue_status(appointments: &[Appointment], now: DateTime<Utc>) -> (DisplayStatus, Option<i64>) {
    let live: Vec<(&Appointment, DisplayStatus)> = appointments
        .iter()
        .filter(|a| !a.is_cancelled())
        .map(|a| (a, derive_status(a, now)))
        .collect();

    if live.is_empty() {
        let latest = appointments.iter().max_by_key(|a| (a.bucket_instant(), a.id));
        return (DisplayStatus::Cancelled, latest.map(|a| a.id));
    }

    let pick = |status: DisplayStatus| live.iter().filter(move |(_, s)| *s == status).map(|(a, _)| *a);

    if let Some(active) = pick(DisplayStatus::InExercise).min_by_key(|a| (a.bucket_instant(), a.id)) {
        return (DisplayStatus::InExercise, Some(active.id));
    }
    if let Some(next) = pick(DisplayStatus::Waiting).min_by_key(|a| (a.bucket_instant(), a.id)) {
        return (DisplayStatus::Waiting, Some(next.id));
    }
    let recent = pick(DisplayStatus::Completed)
        .max_by_key(|a| (a.end_at.unwrap_or_else(|| a.bucket_instant()), a.id));
    (DisplayStatus::Completed, recent.map(|a| a.id))
}
