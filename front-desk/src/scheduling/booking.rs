//! Booking Service (预约提交)
//!
//! The only writer of the appointment store. Every commit re-validates
//! non-overlap inside a conditional write while holding the
//! `(staff, local day)` lock; a lost race surfaces as `SlotUnavailable` and is
//! never retried here.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use shared::error::ErrorCode;
use shared::models::{
    Appointment, AppointmentCreate, AppointmentReschedule, AppointmentType, AppointmentView,
    Rescheduled, TimeWindow,
};
use sqlx::SqlitePool;

use super::lock::BookingLocks;
use super::status::with_status;
use crate::audit_log;
use crate::db::repository::appointment::{self, NewAppointment};
use crate::db::repository::{customer, staff};
use crate::utils::validation::{require_id, require_staff, require_window};
use crate::utils::{AppError, AppResult, TimeModel};

#[derive(Debug)]
pub struct BookingService {
    pool: SqlitePool,
    time: TimeModel,
    locks: BookingLocks,
}

impl BookingService {
    pub fn new(pool: SqlitePool, time: TimeModel) -> Self {
        Self {
            pool,
            time,
            locks: BookingLocks::new(),
        }
    }

    /// Create from an API payload: `PREBOOKING` books a window, `WALKIN` checks in
    pub async fn create(
        &self,
        payload: &AppointmentCreate,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let staff_id = require_staff(payload.staff_id)?;
        let service_id = require_id(payload.service_id, "serviceId")?;
        let customer_id = require_id(payload.customer_id, "customerId")?;

        match payload.appointment_type {
            AppointmentType::Prebooking => {
                let window =
                    require_window(payload.start_at.as_deref(), payload.end_at.as_deref())?;
                self.book(staff_id, service_id, customer_id, window, now)
                    .await
            }
            AppointmentType::Walkin => {
                self.check_in_walkin(staff_id, service_id, customer_id, now)
                    .await
            }
        }
    }

    /// Book a pre-scheduled window
    pub async fn book(
        &self,
        staff_id: i64,
        service_id: i64,
        customer_id: i64,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let day = self.single_local_day(&window)?;
        self.ensure_bookable_staff(staff_id).await?;
        self.ensure_customer(customer_id).await?;

        let data = NewAppointment {
            id: shared::util::snowflake_id(),
            staff_id,
            customer_id,
            service_id,
            window: Some(window),
            appointment_type: AppointmentType::Prebooking,
            created_at: now.timestamp_millis(),
        };

        let key = (staff_id, day);
        let created = {
            let _guard = self.locks.acquire(key).await;
            appointment::insert_if_free(&self.pool, &data).await
        };
        self.locks.release(&[key]);
        let created = created?;

        let Some(created) = created else {
            tracing::info!(staff_id, start = %window.start, "Booking rejected, window taken");
            return Err(AppError::slot_unavailable(staff_id, window.start.to_rfc3339()));
        };

        tracing::info!(
            appointment_id = created.id,
            staff_id,
            customer_id,
            %day,
            "Appointment booked"
        );
        audit_log!(
            "book",
            format!("appointment:{}", created.id),
            format!("staff:{staff_id} customer:{customer_id} {}..{}", window.start, window.end)
        );
        Ok(created)
    }

    /// Register a walk-in; queued by creation time until a window is assigned
    pub async fn check_in_walkin(
        &self,
        staff_id: i64,
        service_id: i64,
        customer_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        self.ensure_bookable_staff(staff_id).await?;
        self.ensure_customer(customer_id).await?;

        let data = NewAppointment {
            id: shared::util::snowflake_id(),
            staff_id,
            customer_id,
            service_id,
            window: None,
            appointment_type: AppointmentType::Walkin,
            created_at: now.timestamp_millis(),
        };
        let created = appointment::insert_if_free(&self.pool, &data)
            .await?
            .ok_or_else(|| AppError::internal("Walk-in insert was rejected"))?;

        tracing::info!(appointment_id = created.id, staff_id, customer_id, "Walk-in checked in");
        audit_log!("walkin", format!("appointment:{}", created.id));
        Ok(created)
    }

    /// Reschedule from an API payload
    pub async fn reschedule_request(
        &self,
        id: i64,
        payload: &AppointmentReschedule,
        now: DateTime<Utc>,
    ) -> AppResult<Rescheduled> {
        let window = require_window(payload.start_at.as_deref(), payload.end_at.as_deref())?;
        let staff_id = payload
            .staff_id
            .map(|id| require_staff(Some(id)))
            .transpose()?;
        self.reschedule(id, staff_id, window, now).await
    }

    /// Move an appointment to a new window (and optionally another staff member)
    ///
    /// `moved_from` is set when the appointment leaves its original local day,
    /// so callers drop it from that day's queue.
    pub async fn reschedule(
        &self,
        id: i64,
        staff_id: Option<i64>,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> AppResult<Rescheduled> {
        let new_day = self.single_local_day(&window)?;
        let mut current = self.get(id).await?;

        // The lock keys come from the row's current day; a concurrent move
        // changes them, so re-read under the locks and retry on mismatch.
        let (target_staff, old_day) = loop {
            if current.is_cancelled() {
                return Err(AppError::new(ErrorCode::AppointmentCancelled).with_detail("id", id));
            }
            let target_staff = staff_id.unwrap_or(current.staff_id);
            self.ensure_bookable_staff(target_staff).await?;

            let old_day = self.time.local_date(current.bucket_instant());
            let keys = [(target_staff, new_day), (current.staff_id, old_day)];
            let guards = self.locks.acquire_all(keys.to_vec()).await;

            let outcome: AppResult<Option<bool>> = match self.get(id).await {
                Ok(latest)
                    if latest.staff_id == current.staff_id
                        && self.time.local_date(latest.bucket_instant()) == old_day =>
                {
                    appointment::reschedule_if_free(
                        &self.pool,
                        id,
                        target_staff,
                        window,
                        now.timestamp_millis(),
                    )
                    .await
                    .map(Some)
                    .map_err(AppError::from)
                }
                Ok(latest) => {
                    current = latest;
                    Ok(None)
                }
                Err(e) => Err(e),
            };
            drop(guards);
            self.locks.release(&keys);

            match outcome? {
                Some(true) => break (target_staff, old_day),
                Some(false) => {
                    // Re-read to report why nothing was written
                    let latest = self.get(id).await?;
                    if latest.is_cancelled() {
                        return Err(
                            AppError::new(ErrorCode::AppointmentCancelled).with_detail("id", id)
                        );
                    }
                    tracing::info!(appointment_id = id, staff_id = target_staff, "Reschedule rejected, window taken");
                    return Err(AppError::slot_unavailable(target_staff, window.start.to_rfc3339()));
                }
                None => {
                    tracing::debug!(appointment_id = id, "Appointment moved concurrently, retrying");
                }
            }
        };

        let appointment = self.get(id).await?;
        let moved_from = (old_day != new_day).then_some(old_day);

        tracing::info!(
            appointment_id = id,
            staff_id = target_staff,
            %new_day,
            moved_from = ?moved_from,
            "Appointment rescheduled"
        );
        audit_log!(
            "reschedule",
            format!("appointment:{id}"),
            format!("staff:{target_staff} {}..{}", window.start, window.end)
        );
        Ok(Rescheduled {
            appointment,
            moved_from,
        })
    }

    /// Manual `CANCELLED` override (terminal, idempotent)
    pub async fn cancel(&self, id: i64, now: DateTime<Utc>) -> AppResult<Appointment> {
        self.get(id).await?;
        let changed = appointment::cancel(&self.pool, id, now.timestamp_millis()).await?;
        let appointment = self.get(id).await?;

        if changed {
            tracing::info!(appointment_id = id, "Appointment cancelled");
            audit_log!("cancel", format!("appointment:{id}"));
        }
        Ok(appointment)
    }

    /// Past visits of a customer, newest first, with live status
    pub async fn history_for_customer(
        &self,
        customer_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentView>> {
        self.ensure_customer(customer_id).await?;
        let appointments = appointment::find_by_customer(&self.pool, customer_id).await?;
        Ok(appointments
            .into_iter()
            .map(|a| with_status(a, now))
            .collect())
    }

    async fn get(&self, id: i64) -> AppResult<Appointment> {
        appointment::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::appointment_not_found(id))
    }

    /// Local day of a window; a window must be non-empty and not cross local midnight
    fn single_local_day(&self, window: &TimeWindow) -> AppResult<NaiveDate> {
        if window.end <= window.start {
            return Err(AppError::new(ErrorCode::InvalidTimeWindow)
                .with_detail("startAt", window.start.to_rfc3339())
                .with_detail("endAt", window.end.to_rfc3339()));
        }
        let day = self.time.local_date(window.start);
        let last_day = self.time.local_date(window.end - Duration::nanoseconds(1));
        if day != last_day {
            return Err(AppError::new(ErrorCode::WindowSpansDays)
                .with_detail("startAt", window.start.to_rfc3339())
                .with_detail("endAt", window.end.to_rfc3339()));
        }
        Ok(day)
    }

    async fn ensure_bookable_staff(&self, staff_id: i64) -> AppResult<()> {
        let member = staff::find_by_id(&self.pool, staff_id)
            .await?
            .ok_or_else(|| AppError::staff_not_found(staff_id))?;
        if !member.is_active {
            return Err(AppError::with_message(
                ErrorCode::StaffInactive,
                format!("Staff {staff_id} is not active"),
            )
            .with_detail("id", staff_id));
        }
        Ok(())
    }

    async fn ensure_customer(&self, customer_id: i64) -> AppResult<()> {
        customer::find_by_id(&self.pool, customer_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::customer_not_found(customer_id))
    }
}
