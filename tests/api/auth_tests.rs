//! Authentication API Tests
//!
//! Every `/api` route requires a bearer token; none of these requests
//! reach the database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::common::{body_json, token_for, TestApp};

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get("/api/get_new_receipt_no/").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], 10003);
}

#[tokio::test]
async fn post_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/update_marks/", &json!({ "student_id": 1, "marks": [] }))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get_auth("/api/months/", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get_auth("/api/months/", &token_for(1, 1, -600)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Token expired");
}

#[tokio::test]
async fn basic_scheme_is_unauthorized() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/api/months/")
        .header("Authorization", "Basic YWRtaW46c2VjcmV0")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
