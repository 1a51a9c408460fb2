//! Marks Entry Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::application::dto::request::UpdateMarksRequest;
use crate::application::dto::response::{PaperResponse, UpdateMarksResponse};
use crate::application::services::{MarksService, MarksServiceImpl};
use crate::domain::services::StudentMarks;
use crate::domain::TenantContext;
use crate::infrastructure::repositories::{
    PgClassRepository, PgExamRepository, PgMarkRepository, PgStudentRepository,
};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::parse_id;

fn marks_service(
    state: &AppState,
) -> MarksServiceImpl<PgExamRepository, PgClassRepository, PgStudentRepository, PgMarkRepository> {
    MarksServiceImpl::new(
        Arc::new(PgExamRepository::new(state.db.clone())),
        Arc::new(PgClassRepository::new(state.db.clone())),
        Arc::new(PgStudentRepository::new(state.db.clone())),
        Arc::new(PgMarkRepository::new(state.db.clone())),
    )
}

/// Marks of every student of a class, provisioning missing rows
pub async fn get_students_for_marks_entry(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path((exam_id, class_id)): Path<(String, String)>,
) -> Result<Json<Vec<StudentMarks>>, AppError> {
    let exam_id = parse_id(&exam_id, "exam")?;
    let class_id = parse_id(&class_id, "class")?;

    let records = marks_service(&state)
        .marks_for_class(&tenant, exam_id, class_id)
        .await?;

    Ok(Json(records))
}

/// Marks of one student looked up by enrollment id
pub async fn get_student_by_enr_no(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path((exam_id, enr_no)): Path<(String, String)>,
) -> Result<Json<StudentMarks>, AppError> {
    let exam_id = parse_id(&exam_id, "exam")?;

    let record = marks_service(&state)
        .marks_for_enrollment(&tenant, exam_id, &enr_no)
        .await?;

    Ok(Json(record))
}

/// Papers of an exam for a class
pub async fn get_subjects_for_exam(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path((exam_id, class_id)): Path<(String, String)>,
) -> Result<Json<Vec<PaperResponse>>, AppError> {
    let exam_id = parse_id(&exam_id, "exam")?;
    let class_id = parse_id(&class_id, "class")?;

    let papers = marks_service(&state)
        .exam_papers(&tenant, exam_id, class_id)
        .await?;

    Ok(Json(papers.into_iter().map(PaperResponse::from).collect()))
}

/// Overwrite a student's scores
pub async fn update_marks(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    ValidatedJson(body): ValidatedJson<UpdateMarksRequest>,
) -> Result<Json<UpdateMarksResponse>, AppError> {
    let updated = marks_service(&state)
        .update_marks(&tenant, body.student_id, body.edits())
        .await?;

    Ok(Json(UpdateMarksResponse { updated }))
}
