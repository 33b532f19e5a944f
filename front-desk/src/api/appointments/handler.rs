//! Appointment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::core::ServerState;
use crate::db::repository::appointment::{self, AppointmentFilter};
use crate::scheduling::with_status;
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::models::{
    Appointment, AppointmentCreate, AppointmentQuery, AppointmentReschedule, AppointmentView,
    Rescheduled,
};

/// GET /api/appointments - 按员工/顾客/本地日期范围查询
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<AppointmentView>>> {
    let from_millis = match query.start_date.as_deref() {
        Some(d) => Some(state.time.local_day_bounds(time::parse_date(d)?).0.timestamp_millis()),
        None => None,
    };
    let until_millis = match query.end_date.as_deref() {
        Some(d) => Some(state.time.local_day_bounds(time::parse_date(d)?).1.timestamp_millis()),
        None => None,
    };
    if let (Some(from), Some(until)) = (from_millis, until_millis)
        && until <= from
    {
        return Err(AppError::validation("endDate must not be before startDate"));
    }

    let filter = AppointmentFilter {
        staff_id: query.staff_id,
        customer_id: query.customer_id,
        from_millis,
        until_millis,
    };
    let now = Utc::now();
    let appointments = appointment::find(&state.pool, &filter).await?;
    Ok(Json(
        appointments.into_iter().map(|a| with_status(a, now)).collect(),
    ))
}

/// GET /api/appointments/:id - 获取单个预约
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppointmentView>> {
    let appointment = appointment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::appointment_not_found(id))?;
    Ok(Json(with_status(appointment, Utc::now())))
}

/// POST /api/appointments - 预约 (PREBOOKING) 或到店登记 (WALKIN)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = state.booking.create(&payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// PUT /api/appointments/:id - 改期
pub async fn reschedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentReschedule>,
) -> AppResult<Json<Rescheduled>> {
    let rescheduled = state
        .booking
        .reschedule_request(id, &payload, Utc::now())
        .await?;
    Ok(Json(rescheduled))
}

/// POST /api/appointments/:id/cancel - 取消 (终态)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.booking.cancel(id, Utc::now()).await?;
    Ok(Json(appointment))
}
