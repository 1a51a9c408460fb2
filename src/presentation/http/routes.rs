//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use tower_http::compression::CompressionLayer;

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, cors, logging, metrics_middleware, request_id_middleware,
};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CompressionLayer::new())
        .layer(logging::create_trace_layer())
        // Runs before the trace layer so spans carry the request id
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors::create_cors_layer(&state.settings.cors))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API routes (protected)
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(marks_routes())
        .merge(receipt_routes())
        .merge(student_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Marks entry routes
fn marks_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/get_students_for_marks_entry/{exam_id}/{class_id}/",
            get(handlers::marks::get_students_for_marks_entry),
        )
        .route(
            "/get_student_by_enr_no/{exam_id}/{enr_no}/",
            get(handlers::marks::get_student_by_enr_no),
        )
        .route(
            "/get_subjects_for_exam/{exam_id}/{class_id}/",
            get(handlers::marks::get_subjects_for_exam),
        )
        .route("/update_marks/", post(handlers::marks::update_marks))
}

/// Receipt routes
fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route("/create_receipt/", post(handlers::receipts::create_receipt))
        .route(
            "/get_student_for_receipt/{enr_no}/",
            get(handlers::receipts::get_student_for_receipt),
        )
        .route("/get_new_receipt_no/", get(handlers::receipts::get_new_receipt_no))
        .route(
            "/students/{enr_no}/receipts/",
            get(handlers::receipts::get_student_receipts),
        )
        .route("/months/", get(handlers::receipts::get_months))
}

/// Student routes
fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students/",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route("/students/promote/", post(handlers::students::promote_students))
        .route(
            "/classes/{class_id}/renumber/",
            post(handlers::students::renumber_class),
        )
}
