mod common;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use juicery_server::{Config, ServerState, api};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = common::memory_db().await;
    let mut config = Config::default();
    config.printer_host = None;
    api::build_app(ServerState::with_db(config, db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn send_raw(app: &Router, uri: &str, content_type: Option<&str>, body: &'static str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = app.clone().oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn intake(app: &Router, pouches: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "Anna Virtanen", "phone": "+358401234567", "total_pouches": pouches })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

async fn create_pallet(app: &Router, capacity: i64) -> String {
    let (status, body) = send(app, "POST", "/api/pallets", Some(json!({ "capacity": capacity }))).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["qr_code"].as_str().unwrap().to_string()
}

fn crate_ids(intake: &Value) -> Vec<String> {
    intake["crates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["qr_code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn intake_validates_before_writing() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/api/customers", Some(json!({ "phone": "1", "total_pouches": 8 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "A", "phone": "1", "total_pouches": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2004);

    let (_, body) = send(&app, "GET", "/api/customers", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn oversized_intake_is_rejected() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "A", "phone": "1", "total_pouches": i64::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "A", "phone": "1", "weight_kg": 1e300 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);
    assert_eq!(body["details"]["field"], "total_pouches");

    let (_, body) = send(&app, "GET", "/api/customers", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn undecodable_bodies_answer_with_envelope() {
    let app = app().await;
    let json_type = Some("application/json");

    let (status, body) = send_raw(
        &app,
        "/api/assign-pallet",
        json_type,
        r#"{"pallet_id":null,"crate_ids":["CRATE_x"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert_eq!(body["message"], "Invalid request body");
    assert!(body["details"]["reason"].is_string());

    let (status, body) = send_raw(&app, "/api/customers", json_type, r#"{"name":"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);

    let (status, body) = send_raw(&app, "/api/assign-shelf", None, r#"{"shelf_id":"SHELF_a"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn intake_then_order_lifecycle() {
    let app = app().await;
    let data = intake(&app, 17).await;
    let order_id = data["order"]["id"].as_i64().unwrap();
    assert_eq!(data["order"]["status"], "pending");
    assert_eq!(crate_ids(&data).len(), 3);

    let uri = format!("/api/orders/{order_id}/processing");
    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order moved to processing");
    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order already processing");

    // Pickup before ready
    let (status, body) = send(&app, "POST", &format!("/api/orders/{order_id}/pickup"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 2003);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/done"),
        Some(json!({ "comment": "cooler 2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let pallet = create_pallet(&app, 40).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/assign-pallet",
        Some(json!({ "pallet_id": pallet, "crate_ids": crate_ids(&data) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("3 crate(s)"));
    assert_eq!(body["data"]["ready_orders"], json!([order_id]));

    let (_, body) = send(&app, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(body["data"]["order"]["status"], "ready-for-pickup");
    assert_eq!(body["data"]["order"]["comment"], "cooler 2");
    assert_eq!(body["data"]["mapped_crates"], 3);

    let (_, body) = send(&app, "GET", "/api/orders?status=ready-for-pickup", None).await;
    assert_eq!(body["data"][0]["customer_name"], "Anna Virtanen");

    let (status, _) = send(&app, "POST", &format!("/api/orders/{order_id}/notify"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", &format!("/api/orders/{order_id}/pickup"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(body["data"]["order"]["status"], "picked-up");
}

#[tokio::test]
async fn processing_unknown_order_is_404() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/api/orders/4242/processing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 2001);
}

#[tokio::test]
async fn bad_status_filter_is_400() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/api/orders?status=shipped", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assign_pallet_error_statuses() {
    let app = app().await;

    let (status, _) = send(&app, "POST", "/api/assign-pallet", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let data = intake(&app, 8).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/assign-pallet",
        Some(json!({ "pallet_id": "PALLET_unknown", "crate_ids": crate_ids(&data) })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Pallet QR not found");

    let first = create_pallet(&app, 40).await;
    let second = create_pallet(&app, 40).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/assign-pallet",
        Some(json!({ "pallet_id": first, "crate_ids": crate_ids(&data) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        "POST",
        "/api/assign-pallet",
        Some(json!({ "pallet_id": second, "crate_ids": crate_ids(&data) })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn bin_round_trip() {
    let app = app().await;
    let data = intake(&app, 8).await;
    let customer_id = data["customer"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/customers/{customer_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/customers/{customer_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", "/api/bin", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", &format!("/api/bin/{customer_id}/restore"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/bin/{customer_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "GET", "/api/customers/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn label_without_printer_is_500() {
    let app = app().await;
    let data = intake(&app, 8).await;
    let order_id = data["order"]["id"].as_i64().unwrap();
    let (status, body) = send(&app, "POST", &format!("/api/orders/{order_id}/label"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 4001);

    let (status, body) = send(&app, "GET", "/api/printer/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["configured"], false);
}

#[tokio::test]
async fn crate_lookup_and_reports() {
    let app = app().await;
    let data = intake(&app, 12).await;
    let qr = crate_ids(&data).remove(0);

    let (status, body) = send(&app, "GET", &format!("/api/crates/{qr}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customer_name"], "Anna Virtanen");
    let (status, _) = send(&app, "GET", "/api/crates/CRATE_nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/reports/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pouches_pending"], 12);
    assert_eq!(body["data"]["crates_total"], 2);

    let (status, _) = send(&app, "GET", "/api/reports/daily?from=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/api/reports/daily", None).await;
    assert_eq!(status, StatusCode::OK);
}
