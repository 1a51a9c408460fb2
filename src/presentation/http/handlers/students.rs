//! Student Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{
    CreateStudentRequest, PromoteStudentsRequest, StudentListQuery,
};
use crate::application::dto::response::{PromoteResponse, StudentResponse};
use crate::application::services::{StudentService, StudentServiceImpl};
use crate::domain::TenantContext;
use crate::infrastructure::repositories::{PgClassRepository, PgStudentRepository};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::parse_id;

fn student_service(state: &AppState) -> StudentServiceImpl<PgStudentRepository, PgClassRepository> {
    StudentServiceImpl::new(
        Arc::new(PgStudentRepository::new(state.db.clone())),
        Arc::new(PgClassRepository::new(state.db.clone())),
    )
}

/// List students ordered by first name
pub async fn list_students(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = student_service(&state)
        .list_students(&tenant, query.class_id)
        .await?;

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

/// Enroll a student at the end of their class's roll
pub async fn create_student(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    ValidatedJson(body): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let student = student_service(&state)
        .create_student(&tenant, body.into())
        .await?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

/// Move students to another class
pub async fn promote_students(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    ValidatedJson(body): ValidatedJson<PromoteStudentsRequest>,
) -> Result<Json<PromoteResponse>, AppError> {
    let promoted = student_service(&state)
        .promote(&tenant, body.student_ids, body.class_id)
        .await?;

    Ok(Json(PromoteResponse { promoted }))
}

/// Reassign roll numbers of a class in name order
pub async fn renumber_class(
    State(state): State<AppState>,
    Extension(tenant): Extension<TenantContext>,
    Path(class_id): Path<String>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let class_id = parse_id(&class_id, "class")?;

    let students = student_service(&state)
        .renumber_class(&tenant, class_id)
        .await?;

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}
