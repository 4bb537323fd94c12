use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use vehicle_emi_tracker::config::EnvironmentConfig;
use vehicle_emi_tracker::create_app;
use vehicle_emi_tracker::models::VehicleRecord;
use vehicle_emi_tracker::repositories::{InMemoryVehicleRepository, VehicleStore};
use vehicle_emi_tracker::state::AppState;

const FORM: &str = "application/x-www-form-urlencoded";

// Función helper para crear la app de test con una flota conocida
fn create_test_app(records: Vec<VehicleRecord>) -> (Router, Arc<dyn VehicleStore>) {
    let store: Arc<dyn VehicleStore> = Arc::new(InMemoryVehicleRepository::new(records));
    let state = AppState::new(EnvironmentConfig::default(), store.clone());
    (create_app(state), store)
}

fn default_fleet() -> Vec<VehicleRecord> {
    let now = Utc::now();
    vec![VehicleRecord::seed("V001", now), VehicleRecord::seed("V002", now)]
}

async fn post(app: &Router, uri: &str, content_type: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

async fn vehicle(store: &Arc<dyn VehicleStore>, id: &str) -> VehicleRecord {
    store.find_by_id(id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_check_payment_future_due_is_paid() {
    let (app, _) = create_test_app(default_fleet());

    let response = post(&app, "/check_payment", FORM, "").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "paid": 1 }));
}

#[tokio::test]
async fn test_check_payment_past_due_is_overdue() {
    let mut overdue = VehicleRecord::seed("V001", Utc::now());
    overdue.due_at = Utc::now() - Duration::hours(1);
    let (app, store) = create_test_app(vec![overdue]);

    let response = post(&app, "/check_payment", FORM, "id=V001").await;

    assert_eq!(body_json(response).await, json!({ "paid": 0 }));
    assert!(!vehicle(&store, "V001").await.paid);
}

#[tokio::test]
async fn test_check_payment_without_content_type() {
    let (app, _) = create_test_app(default_fleet());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/check_payment?id=V002")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["paid"], 1);
}

#[tokio::test]
async fn test_update_loc_stores_exact_coordinates() {
    let (app, store) = create_test_app(default_fleet());
    let before: DateTime<Utc> = Utc::now();

    let response = post(&app, "/update_loc", FORM, "lat=12.97&lon=77.59").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    let v = vehicle(&store, "V001").await;
    assert_eq!(v.lat, 12.97);
    assert_eq!(v.lon, 77.59);
    assert!(v.last_seen.unwrap() >= before);
}

#[tokio::test]
async fn test_update_location_alias_accepts_json() {
    let (app, store) = create_test_app(default_fleet());

    let body = json!({ "id": "V002", "lat": -33.86, "lon": 151.2 }).to_string();
    let response = post(&app, "/update_location", "application/json", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let v = vehicle(&store, "V002").await;
    assert_eq!((v.lat, v.lon), (-33.86, 151.2));
    assert!(vehicle(&store, "V001").await.last_seen.is_none());
}

#[tokio::test]
async fn test_update_loc_rejects_malformed_input() {
    let (app, store) = create_test_app(default_fleet());

    for body in ["lat=abc&lon=77.59", "lat=NaN&lon=1", "lat=12.97", "lat=95&lon=0"] {
        let response = post(&app, "/update_loc", FORM, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
    }

    let v = vehicle(&store, "V001").await;
    assert_eq!((v.lat, v.lon, v.last_seen), (0.0, 0.0, None));
}

#[tokio::test]
async fn test_set_timer_redirects_and_sets_due() {
    let mut overdue = VehicleRecord::seed("V001", Utc::now());
    overdue.paid = false;
    let (app, store) = create_test_app(vec![overdue]);
    let before = Utc::now();

    let response = post(&app, "/set_timer", FORM, "days=0&hours=0&minutes=30").await;
    let after = Utc::now();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let v = vehicle(&store, "V001").await;
    assert!(v.paid);
    assert!(v.due_at >= before + Duration::minutes(30));
    assert!(v.due_at <= after + Duration::minutes(30));
}

#[tokio::test]
async fn test_set_timer_invalid_leaves_due_unchanged() {
    let (app, store) = create_test_app(default_fleet());
    let due_before = vehicle(&store, "V001").await.due_at;

    let response = post(&app, "/set_timer", FORM, "days=one&hours=0&minutes=0").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(vehicle(&store, "V001").await.due_at, due_before);
}

#[tokio::test]
async fn test_mark_paid_always_paid() {
    let mut overdue = VehicleRecord::seed("V001", Utc::now());
    overdue.paid = false;
    overdue.due_at = Utc::now() - Duration::days(1);
    let (app, store) = create_test_app(vec![overdue, VehicleRecord::seed("V002", Utc::now())]);

    for id in ["V001", "V002"] {
        let response = post(&app, "/mark_paid", FORM, &format!("id={}", id)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(vehicle(&store, id).await.paid);
    }

    // El vencido avanza 7 días desde ahora
    assert!(vehicle(&store, "V001").await.due_at > Utc::now() + Duration::days(6));
}

#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let (app, store) = create_test_app(default_fleet());
    let before = store.list().await.unwrap();

    let requests = [
        ("/check_payment", "id=NOPE"),
        ("/update_loc", "id=NOPE&lat=1&lon=2"),
        ("/update_location", "id=NOPE&lat=1&lon=2"),
        ("/set_timer", "id=NOPE&days=1&hours=0&minutes=0"),
        ("/mark_paid", "id=NOPE"),
    ];
    for (uri, body) in requests {
        let response = post(&app, uri, FORM, body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body_text(response).await, "vehicle 'NOPE' not found");
    }

    let response = get(&app, "/api/vehicle_status?id=NOPE").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(store.list().await.unwrap(), before);
}

#[tokio::test]
async fn test_dashboard_is_idempotent() {
    let (app, _) = create_test_app(default_fleet());

    let first = get(&app, "/").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert!(first
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let first = body_text(first).await;
    let second = body_text(get(&app, "/").await).await;

    assert_eq!(first, second);
    assert!(first.contains("Vehicle EMI Tracker"));
    assert!(first.contains("REG-V002"));
}

#[tokio::test]
async fn test_dashboard_reflects_mutations() {
    let (app, _) = create_test_app(default_fleet());

    post(&app, "/update_loc", FORM, "lat=12.97&lon=77.59").await;
    let html = body_text(get(&app, "/").await).await;

    assert!(html.contains("Last known location: 12.97, 77.59"));
    assert!(!html.contains("action=\"/mark_paid\""));
}

#[tokio::test]
async fn test_vehicle_status_api() {
    let (app, _) = create_test_app(default_fleet());
    post(&app, "/update_loc", FORM, "id=V002&lat=1.5&lon=2.5").await;

    let body = body_json(get(&app, "/api/vehicle_status").await).await;
    assert_eq!(body["id"], "V001");
    assert_eq!(body["paid"], true);
    assert_eq!(body["lastSeen"], Value::Null);

    let body = body_json(get(&app, "/api/vehicle_status?id=V002").await).await;
    assert_eq!(body["lat"], 1.5);
    assert_eq!(body["lon"], 2.5);
    assert!(body["lastSeen"].is_string());
    assert!(body["dueAt"].is_string());
}

#[tokio::test]
async fn test_fleet_listing_and_health() {
    let (app, _) = create_test_app(default_fleet());

    let fleet = body_json(get(&app, "/api/vehicles").await).await;
    let ids: Vec<&str> = fleet
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["V001", "V002"]);

    let health = body_json(get(&app, "/health").await).await;
    assert_eq!(health["status"], "ok");
}
