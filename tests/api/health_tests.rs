//! Health Check API Tests

use axum::http::StatusCode;

use crate::common::{body_json, body_text, TestApp};

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn liveness_probe_does_not_need_database() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "alive");
}

#[tokio::test]
async fn readiness_probe_reports_unreachable_database() {
    let app = TestApp::new();

    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["checks"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn metrics_exposes_request_counters() {
    let app = TestApp::new();
    app.get("/health").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("school_admin_http_requests_total"));
    assert!(text.contains("path=\"/health\""));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new();

    let generated = app.get("/health/live").await;
    assert!(generated.headers().contains_key("x-request-id"));

    let request = axum::http::Request::builder()
        .uri("/health/live")
        .header("x-request-id", "req-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let echoed = app.send(request).await;
    assert_eq!(echoed.headers()["x-request-id"], "req-123");
}
