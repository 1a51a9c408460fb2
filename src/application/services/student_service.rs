//! Student Service
//!
//! Handles student enrollment, listing, promotion between classes and
//! explicit roll-number renumbering.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::services::{next_roll_number, renumber};
use crate::domain::{ClassRepository, NewStudent, Student, StudentRepository, TenantContext};
use crate::shared::error::AppError;

/// Student service trait defining all student operations.
#[async_trait]
pub trait StudentService: Send + Sync {
    /// Enroll a student at the end of their class's roll.
    async fn create_student(
        &self,
        tenant: &TenantContext,
        request: CreateStudentDto,
    ) -> Result<Student, StudentError>;

    /// Students of the school ordered by first name, optionally one class.
    async fn list_students(
        &self,
        tenant: &TenantContext,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>, StudentError>;

    /// Move students to another class, keeping their roll numbers.
    async fn promote(
        &self,
        tenant: &TenantContext,
        student_ids: Vec<i64>,
        class_id: i64,
    ) -> Result<u64, StudentError>;

    /// Reassign roll numbers 1..N in name order. Returns the class by roll.
    async fn renumber_class(
        &self,
        tenant: &TenantContext,
        class_id: i64,
    ) -> Result<Vec<Student>, StudentError>;
}

// =============================================================================
// Data Transfer Objects
// =============================================================================

/// Create student request DTO.
#[derive(Debug, Clone)]
pub struct CreateStudentDto {
    pub enrollment_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub class_id: i64,
}

// =============================================================================
// Error Types
// =============================================================================

/// Student service errors.
#[derive(Debug, thiserror::Error)]
pub enum StudentError {
    #[error("Class not found")]
    ClassNotFound,

    #[error("Students not found: {0:?}")]
    StudentsNotFound(Vec<i64>),

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<StudentError> for AppError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::Repository(e) => e,
            other => AppError::NotFound(other.to_string()),
        }
    }
}

// =============================================================================
// Service Implementation
// =============================================================================

/// StudentService implementation generic over its repositories.
pub struct StudentServiceImpl<S, C>
where
    S: StudentRepository,
    C: ClassRepository,
{
    student_repo: Arc<S>,
    class_repo: Arc<C>,
}

impl<S, C> StudentServiceImpl<S, C>
where
    S: StudentRepository,
    C: ClassRepository,
{
    /// Create a new StudentServiceImpl.
    pub fn new(student_repo: Arc<S>, class_repo: Arc<C>) -> Self {
        Self {
            student_repo,
            class_repo,
        }
    }

    async fn ensure_class(
        &self,
        tenant: &TenantContext,
        class_id: i64,
    ) -> Result<(), StudentError> {
        self.class_repo
            .find_by_id(tenant.school_id, class_id)
            .await?
            .ok_or(StudentError::ClassNotFound)?;
        Ok(())
    }
}

/// Trim a name part, dropping it when blank.
fn optional_name(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S, C> StudentService for StudentServiceImpl<S, C>
where
    S: StudentRepository + 'static,
    C: ClassRepository + 'static,
{
    async fn create_student(
        &self,
        tenant: &TenantContext,
        request: CreateStudentDto,
    ) -> Result<Student, StudentError> {
        self.ensure_class(tenant, request.class_id).await?;

        let existing = self
            .student_repo
            .count_by_class(tenant.school_id, request.class_id)
            .await?;

        let student = self
            .student_repo
            .create(&NewStudent {
                school_id: tenant.school_id,
                enrollment_id: request.enrollment_id.trim().to_string(),
                first_name: request.first_name.trim().to_string(),
                middle_name: optional_name(request.middle_name),
                last_name: optional_name(request.last_name),
                class_id: request.class_id,
                roll_no: next_roll_number(existing),
            })
            .await?;

        tracing::info!(
            school_id = tenant.school_id,
            student_id = student.id,
            class_id = student.class_id,
            roll_no = student.roll_no,
            "Student created"
        );

        Ok(student)
    }

    async fn list_students(
        &self,
        tenant: &TenantContext,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>, StudentError> {
        if let Some(class_id) = class_id {
            self.ensure_class(tenant, class_id).await?;
        }
        Ok(self.student_repo.list(tenant.school_id, class_id).await?)
    }

    async fn promote(
        &self,
        tenant: &TenantContext,
        mut student_ids: Vec<i64>,
        class_id: i64,
    ) -> Result<u64, StudentError> {
        self.ensure_class(tenant, class_id).await?;

        student_ids.sort_unstable();
        student_ids.dedup();

        let found = self
            .student_repo
            .find_by_ids(tenant.school_id, &student_ids)
            .await?;
        if found.len() != student_ids.len() {
            let missing: Vec<i64> = student_ids
                .iter()
                .copied()
                .filter(|id| !found.iter().any(|s| s.id == *id))
                .collect();
            return Err(StudentError::StudentsNotFound(missing));
        }

        let moved = self
            .student_repo
            .move_to_class(tenant.school_id, &student_ids, class_id)
            .await?;

        tracing::info!(school_id = tenant.school_id, class_id, moved, "Students promoted");

        Ok(moved)
    }

    async fn renumber_class(
        &self,
        tenant: &TenantContext,
        class_id: i64,
    ) -> Result<Vec<Student>, StudentError> {
        self.ensure_class(tenant, class_id).await?;

        let mut students = self.student_repo.list(tenant.school_id, Some(class_id)).await?;
        let assignments = renumber(&students);
        self.student_repo
            .set_roll_numbers(tenant.school_id, &assignments)
            .await?;

        for (id, roll_no) in &assignments {
            if let Some(student) = students.iter_mut().find(|s| s.id == *id) {
                student.roll_no = *roll_no;
            }
        }
        students.sort_by_key(|s| s.roll_no);

        tracing::info!(
            school_id = tenant.school_id,
            class_id,
            students = students.len(),
            "Class renumbered"
        );

        Ok(students)
    }
}
