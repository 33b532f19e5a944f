//! Router tests driven through `tower::ServiceExt::oneshot`

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use front_desk::api::build_app;
use front_desk::core::ServerState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = memory_pool().await;
    seed_clinic(&pool).await;
    let billing = StubBilling::with(&[(101, 500.0, 1500.0)]).shared();
    build_app(ServerState::new(test_config(), pool, billing))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn booking(staff: i64, customer: i64, start: &str, end: &str) -> Value {
    json!({
        "staffId": staff,
        "serviceId": 7,
        "customerId": customer,
        "startAt": start,
        "endAt": end,
        "appointmentType": "PREBOOKING"
    })
}

#[tokio::test]
async fn test_conflict_is_distinguishable_from_validation() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(booking(1, 101, "2030-01-15T10:00:00+05:30", "2030-01-15T10:30:00+05:30")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["startAt"], "2030-01-15T04:30:00Z");
    assert_eq!(created["status"], "PENDING");

    let (status, body) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(booking(1, 102, "2030-01-15T10:15:00+05:30", "2030-01-15T10:45:00+05:30")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1002);

    let (status, body) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(booking(1, 102, "2030-01-15T11:00:00+05:30", "2030-01-15T10:45:00+05:30")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1004);

    let (status, body) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(json!({ "serviceId": 7, "customerId": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2003);
}

#[tokio::test]
async fn test_slots_reflect_bookings_and_exclusions() {
    let app = app().await;
    let (_, all) = send(&app, "GET", "/api/slots?staffId=1&date=2030-01-15", None).await;
    let total = all.as_array().unwrap().len();
    assert_eq!(total, 24);
    assert_eq!(all[0]["startIso"], "2030-01-15T03:30:00Z");
    assert_eq!(all[0]["staffIds"], json!([1]));

    let (_, created) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(booking(1, 101, "2030-01-15T09:00:00+05:30", "2030-01-15T09:30:00+05:30")),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (_, after) = send(&app, "GET", "/api/slots?staffId=1&date=2030-01-15", None).await;
    assert_eq!(after.as_array().unwrap().len(), total - 1);

    let uri = format!("/api/slots?staffId=1&date=2030-01-15&excludeAppointmentId={id}");
    let (_, excluded) = send(&app, "GET", &uri, None).await;
    assert_eq!(excluded.as_array().unwrap().len(), total);

    let uri = "/api/slots?staffId=1&date=2030-01-15&excludeStart=2030-01-15T03:30:00Z&excludeEnd=2030-01-15T04:00:00Z";
    let (_, excluded) = send(&app, "GET", uri, None).await;
    assert_eq!(excluded.as_array().unwrap().len(), total);

    let (status, none) = send(&app, "GET", "/api/slots?date=2030-01-15", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));

    let (status, _) = send(&app, "GET", "/api/slots?staffId=1&date=15-01-2030", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reschedule_cancel_and_history() {
    let app = app().await;
    let (_, created) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(booking(1, 101, "2030-01-15T10:00:00+05:30", "2030-01-15T10:30:00+05:30")),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, moved) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{id}"),
        Some(json!({
            "staffId": 2,
            "startAt": "2030-01-16T10:00:00+05:30",
            "endAt": "2030-01-16T10:30:00+05:30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["movedFrom"], "2030-01-15");
    assert_eq!(moved["appointment"]["staffId"], 2);

    let (status, cancelled) =
        send(&app, "POST", &format!("/api/appointments/{id}/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{id}"),
        Some(json!({
            "startAt": "2030-01-17T10:00:00+05:30",
            "endAt": "2030-01-17T10:30:00+05:30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1003);

    let (status, view) = send(&app, "GET", &format!("/api/appointments/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["displayStatus"], "Cancelled");

    let (status, history) = send(&app, "GET", "/api/customers/101/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/appointments/424242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_queue_list_and_staff_endpoints() {
    let app = app().await;
    send(
        &app,
        "POST",
        "/api/appointments",
        Some(booking(1, 101, "2030-01-15T10:00:00+05:30", "2030-01-15T10:30:00+05:30")),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/appointments",
        Some(json!({ "staffId": 2, "serviceId": 7, "customerId": 102, "appointmentType": "WALKIN" })),
    )
    .await;

    let (status, queue) = send(&app, "GET", "/api/queue?date=2030-01-15", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = queue.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["customerId"], 101);
    assert_eq!(items[0]["queueStatus"], "Waiting");
    assert_eq!(items[0]["pendingAmount"], 1000.0);
    assert_eq!(items[0]["customer"]["firstName"], "Asha");

    // The walk-in was created now, so it is on today's queue
    let (_, today) = send(&app, "GET", "/api/queue", None).await;
    let today = today.as_array().unwrap();
    assert!(today.iter().any(|i| i["customerId"] == 102));

    let (_, listed) = send(
        &app,
        "GET",
        "/api/appointments?staffId=1&startDate=2030-01-15&endDate=2030-01-15",
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["displayStatus"], "Waiting");

    let (status, _) = send(
        &app,
        "GET",
        "/api/appointments?startDate=2030-01-16&endDate=2030-01-15",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, active) = send(&app, "GET", "/api/staff?isActive=true", None).await;
    let names: Vec<_> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Arjun", "Priya"]);

    let (_, everyone) = send(&app, "GET", "/api/staff", None).await;
    assert_eq!(everyone.as_array().unwrap().len(), 3);
}
