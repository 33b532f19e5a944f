//! Display status derivation
//!
//! Status is computed from wall-clock time on every read. The stored
//! `status` column only matters when it is `CANCELLED`.

use chrono::{DateTime, Utc};
use shared::models::{Appointment, AppointmentView, DisplayStatus};

/// Derive the display status of an appointment at `now`
///
/// 1. `CANCELLED` always wins
/// 2. no `start_at` (unscheduled walk-in) → Waiting
/// 3. `now < start_at` → Waiting
/// 4. `start_at <= now < end_at`, or started with no `end_at` → In Exercise
/// 5. otherwise → Completed
pub fn derive_status(appointment: &Appointment, now: DateTime<Utc>) -> DisplayStatus {
    if appointment.is_cancelled() {
        return DisplayStatus::Cancelled;
    }
    let Some(start) = appointment.start_at else {
        return DisplayStatus::Waiting;
    };
    if now < start {
        return DisplayStatus::Waiting;
    }
    match appointment.end_at {
        Some(end) if now >= end => DisplayStatus::Completed,
        _ => DisplayStatus::InExercise,
    }
}

/// Attach the derived status for read views
pub fn with_status(appointment: Appointment, now: DateTime<Utc>) -> AppointmentView {
    let display_status = derive_status(&appointment, now);
    AppointmentView {
        appointment,
        display_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared::models::{AppointmentStatus, AppointmentType};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn appointment(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Appointment {
        Appointment {
            id: 1,
            staff_id: 1,
            customer_id: 1,
            service_id: 1,
            start_at: start,
            end_at: end,
            status: AppointmentStatus::Confirmed,
            appointment_type: AppointmentType::Prebooking,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        }
    }

    #[test]
    fn test_status_follows_the_clock() {
        let appt = appointment(Some(at(10, 0)), Some(at(10, 30)));
        assert_eq!(derive_status(&appt, at(9, 59)), DisplayStatus::Waiting);
        assert_eq!(derive_status(&appt, at(10, 0)), DisplayStatus::InExercise);
        assert_eq!(derive_status(&appt, at(10, 15)), DisplayStatus::InExercise);
        assert_eq!(derive_status(&appt, at(10, 30)), DisplayStatus::Completed);
        assert_eq!(derive_status(&appt, at(10, 31)), DisplayStatus::Completed);
    }

    #[test]
    fn test_status_is_monotonic() {
        fn rank(s: DisplayStatus) -> u8 {
            match s {
                DisplayStatus::Waiting => 0,
                DisplayStatus::InExercise => 1,
                DisplayStatus::Completed => 2,
                DisplayStatus::Cancelled => 3,
            }
        }
        let appt = appointment(Some(at(10, 0)), Some(at(10, 30)));
        let mut previous = 0;
        for minute in 0..120 {
            let now = at(9, 30) + Duration::minutes(minute);
            let current = rank(derive_status(&appt, now));
            assert!(current >= previous, "status went backwards at {now}");
            previous = current;
        }
    }

    #[test]
    fn test_cancelled_overrides_any_time() {
        let mut appt = appointment(Some(at(10, 0)), Some(at(10, 30)));
        appt.status = AppointmentStatus::Cancelled;
        for now in [at(9, 0), at(10, 15), at(11, 0)] {
            assert_eq!(derive_status(&appt, now), DisplayStatus::Cancelled);
        }
    }

    #[test]
    fn test_manual_completed_does_not_override_clock() {
        let mut appt = appointment(Some(at(10, 0)), Some(at(10, 30)));
        appt.status = AppointmentStatus::Completed;
        assert_eq!(derive_status(&appt, at(9, 0)), DisplayStatus::Waiting);
    }

    #[test]
    fn test_walkins() {
        let unscheduled = appointment(None, None);
        assert_eq!(derive_status(&unscheduled, at(23, 0)), DisplayStatus::Waiting);

        let started = appointment(Some(at(10, 0)), None);
        assert_eq!(derive_status(&started, at(9, 0)), DisplayStatus::Waiting);
        assert_eq!(derive_status(&started, at(18, 0)), DisplayStatus::InExercise);
    }

    #[test]
    fn test_with_status_serializes_flat() {
        let view = with_status(appointment(Some(at(10, 0)), Some(at(10, 30))), at(10, 5));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["displayStatus"], "In Exercise");
        assert_eq!(json["id"], 1);
    }
}
