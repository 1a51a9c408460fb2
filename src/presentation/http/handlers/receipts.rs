//! Receipt Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateReceiptRequest;
use crate::application::dto::response::{
    CreateReceiptResponse, NewReceiptNoResponse, ReceiptContextResponse, ReceiptResponse,
};
use crate::application::services::{ReceiptService, ReceiptServiceImpl};
use crate::domain::{Month, TenantContext};
use crate::infrastructure::repositories::{
    PgClassRepository, PgMonthRepository, PgReceiptRepository, PgStudentRepository,
};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

type PgReceiptService = ReceiptServiceImpl<
    PgStudentRepository,
    PgClassRepository,
    PgReceiptRepository,
    PgMonthRepository,
>;

fn receipt_service(state: &AppState) -> PgReceiptService {
    ReceiptServiceImpl::new(
        Arc::new(PgStudentRepository::new(state.db.clone())),
        Arc::new(PgClassRepository::new(state.db.clone())),
        Arc::new(PgReceiptRepository::new(state.db.clone())),
        Arc::new(PgMonthRepository::new(state.db.clone())),
    )
}

/// Record a payment, settling older balances first
pub async fn create_receipt(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    ValidatedJson(body): ValidatedJson<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<CreateReceiptResponse>), AppError> {
    let recorded = receipt_service(&state)
        .create_receipt(&tenant, body.into())
        .await?;

    Ok((StatusCode::CREATED, Json(CreateReceiptResponse::from(recorded))))
}

/// Student, class fee, outstanding balance and covered months for the receipt form
pub async fn get_student_for_receipt(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path(enr_no): Path<String>,
) -> Result<Json<ReceiptContextResponse>, AppError> {
    let context = receipt_service(&state)
        .receipt_context(&tenant, &enr_no)
        .await?;

    Ok(Json(context.into()))
}

/// Next free receipt number
pub async fn get_new_receipt_no(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
) -> Result<Json<NewReceiptNoResponse>, AppError> {
    let receipt_no = receipt_service(&state).next_receipt_no(&tenant).await?;

    Ok(Json(NewReceiptNoResponse { receipt_no }))
}

/// Receipts of a student, newest first
pub async fn get_student_receipts(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path(enr_no): Path<String>,
) -> Result<Json<Vec<ReceiptResponse>>, AppError> {
    let receipts = receipt_service(&state)
        .receipt_history(&tenant, &enr_no)
        .await?;

    Ok(Json(receipts.into_iter().map(ReceiptResponse::from).collect()))
}

/// Months a receipt can cover
pub async fn get_months(State(state): State<AppState>) -> Result<Json<Vec<Month>>, AppError> {
    let months = receipt_service(&state).months().await?;

    Ok(Json(months))
}
