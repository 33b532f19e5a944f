//! Slot planning (可预约时段)
//!
//! Read-only: the planner takes no locks. Commit-time re-validation lives in
//! [`super::BookingService`].

use chrono::{Duration, NaiveDate};
use shared::models::{Appointment, Slot, TimeWindow};
use sqlx::SqlitePool;

use crate::core::config::ClinicHours;
use crate::db::repository::{appointment, staff};
use crate::utils::{AppError, AppResult, TimeModel};

/// Slot lookup parameters
#[derive(Debug, Clone, Default)]
pub struct SlotRequest {
    pub staff_id: Option<i64>,
    pub date: Option<NaiveDate>,
    /// Appointment being rescheduled; never blocks itself
    pub exclude_appointment_id: Option<i64>,
    /// Windows whose appointments should not block (in-flight reschedule)
    pub extra_excluded_windows: Vec<TimeWindow>,
}

#[derive(Debug, Clone)]
pub struct SlotPlanner {
    pool: SqlitePool,
    time: TimeModel,
    hours: ClinicHours,
}

impl SlotPlanner {
    pub fn new(pool: SqlitePool, time: TimeModel, hours: ClinicHours) -> Self {
        Self { pool, time, hours }
    }

    pub fn hours(&self) -> ClinicHours {
        self.hours
    }

    /// Fixed-granularity partition of the clinic's hours on `date`
    ///
    /// A trailing remainder shorter than one slot is dropped.
    pub fn candidate_slots(&self, staff_id: i64, date: NaiveDate) -> Vec<Slot> {
        let open = self.time.at_local(date, self.hours.open);
        let close = self.time.at_local(date, self.hours.close);
        let step = Duration::minutes(i64::from(self.hours.slot_minutes));

        let mut slots = Vec::new();
        let mut start = open;
        while start + step <= close {
            slots.push(Slot::new(staff_id, TimeWindow::new(start, start + step)));
            start += step;
        }
        slots
    }

    /// Drop candidates that overlap a blocking appointment
    ///
    /// An appointment does not block when it is cancelled, has no full window,
    /// is `exclude_id`, or lies inside one of `excluded_windows`.
    pub fn plan(
        candidates: Vec<Slot>,
        existing: &[Appointment],
        exclude_id: Option<i64>,
        excluded_windows: &[TimeWindow],
    ) -> Vec<Slot> {
        let blocking: Vec<TimeWindow> = existing
            .iter()
            .filter(|a| a.blocks_schedule() && Some(a.id) != exclude_id)
            .filter_map(Appointment::window)
            .filter(|w| !excluded_windows.iter().any(|ex| ex.contains_window(w)))
            .collect();

        let mut free: Vec<Slot> = candidates
            .into_iter()
            .filter(|slot| {
                let window = slot.window();
                !blocking.iter().any(|b| b.overlaps(&window))
            })
            .collect();
        free.sort_by_key(|slot| slot.start_iso);
        free
    }

    /// Bookable slots for a staff member on a local day
    ///
    /// No staff selected → empty. Unknown staff → `StaffNotFound`.
    /// Inactive staff → empty.
    pub async fn available_slots(&self, request: &SlotRequest) -> AppResult<Vec<Slot>> {
        let Some(staff_id) = request.staff_id else {
            return Ok(Vec::new());
        };
        let date = request
            .date
            .ok_or_else(|| AppError::required("date"))?;

        let member = staff::find_by_id(&self.pool, staff_id)
            .await?
            .ok_or_else(|| AppError::staff_not_found(staff_id))?;
        if !member.is_active {
            tracing::debug!(staff_id, "Inactive staff has no slots");
            return Ok(Vec::new());
        }

        let (day_start, day_end) = self.time.local_day_bounds(date);
        let existing = appointment::find_for_staff_in_range(
            &self.pool,
            staff_id,
            day_start.timestamp_millis(),
            day_end.timestamp_millis(),
        )
        .await?;

        let candidates = self.candidate_slots(staff_id, date);
        let total = candidates.len();
        let free = Self::plan(
            candidates,
            &existing,
            request.exclude_appointment_id,
            &request.extra_excluded_windows,
        );

        tracing::debug!(
            staff_id,
            %date,
            total,
            free = free.len(),
            booked = existing.len(),
            "Planned slots"
        );
        Ok(free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::appointment::{NewAppointment, insert_if_free};
    use crate::db::repository::test_support::{insert_customer, insert_staff, test_pool};
    use crate::utils::time::{parse_clock, parse_offset};
    use chrono::{DateTime, TimeZone, Utc};
    use shared::error::ErrorCode;
    use shared::models::{AppointmentStatus, AppointmentType};

    fn ist() -> TimeModel {
        TimeModel::new(parse_offset("+05:30").unwrap())
    }

    fn hours(open: &str, close: &str, minutes: u32) -> ClinicHours {
        ClinicHours::new(parse_clock(open).unwrap(), parse_clock(close).unwrap(), minutes).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    /// Local time on 2024-03-02 at +05:30
    fn local(h: u32, m: u32) -> DateTime<Utc> {
        ist().at_local(date(), chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn booked(id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            staff_id: 1,
            customer_id: 1,
            service_id: 1,
            start_at: Some(start),
            end_at: Some(end),
            status: AppointmentStatus::Pending,
            appointment_type: AppointmentType::Prebooking,
            created_at: start,
            updated_at: start,
        }
    }

    fn planner_without_db(h: ClinicHours) -> SlotPlanner {
        let pool = sqlx::sqlite::SqlitePoolOptions::new().connect_lazy("sqlite::memory:").unwrap();
        SlotPlanner::new(pool, ist(), h)
    }

    #[tokio::test]
    async fn test_candidates_follow_local_hours() {
        let planner = planner_without_db(hours("09:00", "11:00", 30));
        let slots = planner.candidate_slots(4, date());
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].start_iso, Utc.with_ymd_and_hms(2024, 3, 2, 3, 30, 0).unwrap());
        assert_eq!(slots[3].end_iso, Utc.with_ymd_and_hms(2024, 3, 2, 5, 30, 0).unwrap());
        assert_eq!(slots[0].staff_ids, vec![4]);
    }

    #[tokio::test]
    async fn test_candidates_drop_short_remainder() {
        let planner = planner_without_db(hours("09:00", "10:45", 30));
        assert_eq!(planner.candidate_slots(1, date()).len(), 3);
    }

    #[tokio::test]
    async fn test_plan_excludes_overlaps() {
        let planner = planner_without_db(hours("09:00", "11:00", 30));
        let existing = vec![booked(1, local(9, 15), local(9, 45))];
        let free = SlotPlanner::plan(planner.candidate_slots(1, date()), &existing, None, &[]);
        let starts: Vec<_> = free.iter().map(|s| s.start_iso).collect();
        assert_eq!(starts, vec![local(10, 0), local(10, 30)]);
    }

    #[tokio::test]
    async fn test_plan_touching_appointment_does_not_block() {
        let planner = planner_without_db(hours("09:00", "10:00", 30));
        let existing = vec![booked(1, local(8, 30), local(9, 0))];
        let free = SlotPlanner::plan(planner.candidate_slots(1, date()), &existing, None, &[]);
        assert_eq!(free.len(), 2);
    }

    #[tokio::test]
    async fn test_plan_exclusions() {
        let planner = planner_without_db(hours("09:00", "10:00", 30));
        let existing = vec![
            booked(1, local(9, 0), local(9, 30)),
            booked(2, local(9, 30), local(10, 0)),
        ];
        let candidates = planner.candidate_slots(1, date());

        assert!(SlotPlanner::plan(candidates.clone(), &existing, None, &[]).is_empty());

        let free = SlotPlanner::plan(candidates.clone(), &existing, Some(1), &[]);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].start_iso, local(9, 0));

        let original = TimeWindow::new(local(9, 30), local(10, 0));
        let free = SlotPlanner::plan(candidates, &existing, Some(1), &[original]);
        assert_eq!(free.len(), 2);
    }

    #[tokio::test]
    async fn test_available_slots_reads_store() {
        let pool = test_pool().await;
        insert_staff(&pool, 1, "Priya", true).await;
        insert_staff(&pool, 2, "Arjun", false).await;
        insert_customer(&pool, 1, "Asha", "9800000001").await;
        let planner = SlotPlanner::new(pool.clone(), ist(), hours("09:00", "11:00", 30));

        insert_if_free(
            &pool,
            &NewAppointment {
                id: 10,
                staff_id: 1,
                customer_id: 1,
                service_id: 1,
                window: Some(TimeWindow::new(local(10, 0), local(10, 30))),
                appointment_type: AppointmentType::Prebooking,
                created_at: 0,
            },
        )
        .await
        .unwrap();

        let request = SlotRequest {
            staff_id: Some(1),
            date: Some(date()),
            ..Default::default()
        };
        let free = planner.available_slots(&request).await.unwrap();
        assert_eq!(free.len(), 3);
        assert!(free.windows(2).all(|w| w[0].start_iso < w[1].start_iso));
        assert!(free.iter().all(|s| s.start_iso != local(10, 0)));

        let rescheduling = SlotRequest {
            exclude_appointment_id: Some(10),
            ..request.clone()
        };
        assert_eq!(planner.available_slots(&rescheduling).await.unwrap().len(), 4);

        // Staff not selected
        let none = SlotRequest {
            staff_id: None,
            ..request.clone()
        };
        assert!(planner.available_slots(&none).await.unwrap().is_empty());

        // Inactive staff
        let inactive = SlotRequest {
            staff_id: Some(2),
            ..request.clone()
        };
        assert!(planner.available_slots(&inactive).await.unwrap().is_empty());

        let unknown = SlotRequest {
            staff_id: Some(99),
            ..request
        };
        let err = planner.available_slots(&unknown).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffNotFound);
    }
}
