//! Payload Validation Tests
//!
//! Malformed payloads are rejected after authentication and before any
//! database access.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{body_json, valid_token, TestApp};

#[tokio::test]
async fn negative_mark_is_a_field_error() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/update_marks/",
            &json!({
                "student_id": 4,
                "marks": [
                    { "paper_id": 1, "marks": -5 },
                    { "paper_id": 2, "marks": 40 }
                ]
            }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "marks[0].marks");
    assert_eq!(json["errors"][0]["message"], "must not be negative");
}

#[tokio::test]
async fn empty_mark_batch_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/update_marks/",
            &json!({ "student_id": 4, "marks": [] }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["errors"][0]["field"], "marks");
}

#[tokio::test]
async fn negative_deposit_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/create_receipt/",
            &json!({ "student_id": 4, "monthly_fees": 500, "deposit_fees": -1 }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["errors"][0]["field"], "deposit_fees");
}

#[tokio::test]
async fn blank_student_name_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/students/",
            &json!({ "enrollment_id": "E-100", "first_name": "", "class_id": 2 }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["errors"][0]["field"], "first_name");
}

#[tokio::test]
async fn promotion_needs_students() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/students/promote/",
            &json!({ "student_ids": [], "class_id": 2 }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_numeric_path_id_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .get_auth("/api/get_students_for_marks_entry/abc/1/", &valid_token())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid exam ID");
}

#[tokio::test]
async fn missing_field_is_a_json_field_error() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/update_marks/",
            &json!({ "marks": [{ "paper_id": 1, "marks": 40 }] }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["content-type"], "application/json");
    let json = body_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "student_id");
}

#[tokio::test]
async fn wrongly_typed_mark_is_a_json_field_error() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/update_marks/",
            &json!({ "student_id": 4, "marks": [{ "paper_id": 1, "marks": "abc" }] }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["content-type"], "application/json");
    let json = body_json(response).await;
    assert_eq!(json["code"], 10007);
    assert_eq!(json["errors"][0]["field"], "marks[0].marks");
}

#[tokio::test]
async fn score_beyond_column_range_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/update_marks/",
            &json!({ "student_id": 4, "marks": [{ "paper_id": 1, "marks": 1234567 }] }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["errors"][0]["field"], "marks[0].marks");
}

#[tokio::test]
async fn oversized_fee_is_rejected_before_totalling() {
    let app = TestApp::new();

    let response = app
        .post_json_auth(
            "/api/create_receipt/",
            &json!({
                "student_id": 4,
                "admission_fees": "70000000000000000000000000000",
                "monthly_fees": "70000000000000000000000000000"
            }),
            &valid_token(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["errors"][0]["field"], "admission_fees");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/students/")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", valid_token()))
        .body(axum::body::Body::from("{\"first_name\": "))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 10002);
}
