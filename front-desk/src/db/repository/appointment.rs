//! Appointment Repository
//!
//! Double-booking is prevented here at commit time: inserts and reschedules
//! are single conditional statements that only write when no other
//! non-cancelled window of the same staff member overlaps `[start, end)`.

use super::{RepoError, RepoResult};
use shared::models::{Appointment, AppointmentStatus, AppointmentType, TimeWindow};
use shared::util::millis_to_utc;
use sqlx::SqlitePool;

const APPOINTMENT_SELECT: &str = "SELECT id, staff_id, customer_id, service_id, start_at, end_at, status, appointment_type, created_at, updated_at FROM appointment";

/// Raw row (millis + text enums)
#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    staff_id: i64,
    customer_id: i64,
    service_id: i64,
    start_at: Option<i64>,
    end_at: Option<i64>,
    status: String,
    appointment_type: String,
    created_at: i64,
    updated_at: i64,
}

fn instant(millis: i64, id: i64) -> RepoResult<chrono::DateTime<chrono::Utc>> {
    millis_to_utc(millis)
        .ok_or_else(|| RepoError::Corrupt(format!("appointment {id}: timestamp {millis} out of range")))
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RepoError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(Appointment {
            id,
            staff_id: row.staff_id,
            customer_id: row.customer_id,
            service_id: row.service_id,
            start_at: row.start_at.map(|ms| instant(ms, id)).transpose()?,
            end_at: row.end_at.map(|ms| instant(ms, id)).transpose()?,
            status: row
                .status
                .parse::<AppointmentStatus>()
                .map_err(|e| RepoError::Corrupt(format!("appointment {id}: {e}")))?,
            appointment_type: row
                .appointment_type
                .parse::<AppointmentType>()
                .map_err(|e| RepoError::Corrupt(format!("appointment {id}: {e}")))?,
            created_at: instant(row.created_at, id)?,
            updated_at: instant(row.updated_at, id)?,
        })
    }
}

fn into_models(rows: Vec<AppointmentRow>) -> RepoResult<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}

/// New appointment to insert (walk-ins carry no window)
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub id: i64,
    pub staff_id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub window: Option<TimeWindow>,
    pub appointment_type: AppointmentType,
    pub created_at: i64,
}

/// List filter; range applies to the bucketing instant (`start_at ?? created_at`)
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub staff_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub from_millis: Option<i64>,
    pub until_millis: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Appointment>> {
    let row = sqlx::query_as::<_, AppointmentRow>(&format!("{APPOINTMENT_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(Appointment::try_from).transpose()
}

pub async fn find(pool: &SqlitePool, filter: &AppointmentFilter) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{APPOINTMENT_SELECT} WHERE (?1 IS NULL OR staff_id = ?1) AND (?2 IS NULL OR customer_id = ?2) AND (?3 IS NULL OR COALESCE(start_at, created_at) >= ?3) AND (?4 IS NULL OR COALESCE(start_at, created_at) < ?4) ORDER BY COALESCE(start_at, created_at), id"
    ))
    .bind(filter.staff_id)
    .bind(filter.customer_id)
    .bind(filter.from_millis)
    .bind(filter.until_millis)
    .fetch_all(pool)
    .await?;
    into_models(rows)
}

/// Every appointment of a customer, newest first
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{APPOINTMENT_SELECT} WHERE customer_id = ? ORDER BY COALESCE(start_at, created_at) DESC, id DESC"
    ))
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    into_models(rows)
}

/// Non-cancelled windows of one staff member intersecting `[start, end)`
pub async fn find_for_staff_in_range(
    pool: &SqlitePool,
    staff_id: i64,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{APPOINTMENT_SELECT} WHERE staff_id = ? AND status != 'CANCELLED' AND start_at IS NOT NULL AND end_at IS NOT NULL AND start_at < ? AND end_at > ? ORDER BY start_at, id"
    ))
    .bind(staff_id)
    .bind(end_millis)
    .bind(start_millis)
    .fetch_all(pool)
    .await?;
    into_models(rows)
}

/// All appointments (any status) touching the UTC range `[start, end)`
///
/// Scheduled rows match on their window (an open-ended start counts as an
/// instant); unscheduled walk-ins match on `created_at`.
pub async fn find_overlapping_day(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{APPOINTMENT_SELECT} WHERE (start_at IS NOT NULL AND start_at < ?2 AND COALESCE(end_at, start_at + 1) > ?1) OR (start_at IS NULL AND created_at >= ?1 AND created_at < ?2) ORDER BY COALESCE(start_at, created_at), id"
    ))
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;
    into_models(rows)
}

/// Insert unless the staff member already holds an overlapping window
///
/// Returns `None` on conflict. Walk-ins without a window always insert.
pub async fn insert_if_free(
    pool: &SqlitePool,
    data: &NewAppointment,
) -> RepoResult<Option<Appointment>> {
    let (start, end) = match data.window {
        Some(w) => (Some(w.start.timestamp_millis()), Some(w.end.timestamp_millis())),
        None => (None, None),
    };

    let rows = sqlx::query(
        "INSERT INTO appointment (id, staff_id, customer_id, service_id, start_at, end_at, status, appointment_type, created_at, updated_at) \
         SELECT ?1, ?2, ?3, ?4, ?5, ?6, 'PENDING', ?7, ?8, ?8 \
         WHERE NOT EXISTS (SELECT 1 FROM appointment o WHERE o.staff_id = ?2 AND o.status != 'CANCELLED' AND o.start_at IS NOT NULL AND o.end_at IS NOT NULL AND o.start_at < ?6 AND o.end_at > ?5)",
    )
    .bind(data.id)
    .bind(data.staff_id)
    .bind(data.customer_id)
    .bind(data.service_id)
    .bind(start)
    .bind(end)
    .bind(data.appointment_type.as_str())
    .bind(data.created_at)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, data.id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create appointment {}", data.id)))
        .map(Some)
}

/// Move a non-cancelled appointment unless the target window is taken
///
/// The appointment never conflicts with itself. Returns `false` when nothing
/// was written (missing, cancelled, or conflicting); callers re-read to tell
/// which.
pub async fn reschedule_if_free(
    pool: &SqlitePool,
    id: i64,
    staff_id: i64,
    window: TimeWindow,
    now_millis: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE appointment SET staff_id = ?2, start_at = ?3, end_at = ?4, updated_at = ?5 \
         WHERE id = ?1 AND status != 'CANCELLED' \
         AND NOT EXISTS (SELECT 1 FROM appointment o WHERE o.id != ?1 AND o.staff_id = ?2 AND o.status != 'CANCELLED' AND o.start_at IS NOT NULL AND o.end_at IS NOT NULL AND o.start_at < ?4 AND o.end_at > ?3)",
    )
    .bind(id)
    .bind(staff_id)
    .bind(window.start.timestamp_millis())
    .bind(window.end.timestamp_millis())
    .bind(now_millis)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Manual `CANCELLED` override; `false` when already cancelled or missing
pub async fn cancel(pool: &SqlitePool, id: i64, now_millis: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE appointment SET status = 'CANCELLED', updated_at = ?2 WHERE id = ?1 AND status != 'CANCELLED'",
    )
    .bind(id)
    .bind(now_millis)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
