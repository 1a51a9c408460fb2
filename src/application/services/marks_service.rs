//! Marks Service
//!
//! Handles the marks-entry screens: provisioning zero-mark rows for every
//! student and applicable paper, grouping marks by student, listing the
//! papers of an exam and applying score edits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::services::{group_marks, StudentMarks};
use crate::domain::{
    ClassRepository, ExamPaper, ExamRepository, MarkEdit, MarkRepository, MarkUpdateOutcome,
    Student, StudentRepository, TenantContext,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Marks service trait defining all marks-entry operations.
#[async_trait]
pub trait MarksService: Send + Sync {
    /// Provision and return marks for every student of a class.
    async fn marks_for_class(
        &self,
        tenant: &TenantContext,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<StudentMarks>, MarksError>;

    /// Provision and return marks for one student, looked up by enrollment id.
    async fn marks_for_enrollment(
        &self,
        tenant: &TenantContext,
        exam_id: i64,
        enrollment_id: &str,
    ) -> Result<StudentMarks, MarksError>;

    /// Papers of an exam for a class. Provisions nothing.
    async fn exam_papers(
        &self,
        tenant: &TenantContext,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<ExamPaper>, MarksError>;

    /// Overwrite a student's scores. Returns the number of rows written.
    async fn update_marks(
        &self,
        tenant: &TenantContext,
        student_id: i64,
        edits: Vec<MarkEdit>,
    ) -> Result<u64, MarksError>;
}

// =============================================================================
// Error Types
// =============================================================================

/// Marks service errors.
#[derive(Debug, thiserror::Error)]
pub enum MarksError {
    #[error("Exam not found")]
    ExamNotFound,

    #[error("Class not found")]
    ClassNotFound,

    #[error("Student not found")]
    StudentNotFound,

    #[error("Class is not included in this exam")]
    ClassNotInExam,

    #[error("No mark recorded for paper {paper_id}")]
    MarkNotFound { paper_id: i64 },

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<MarksError> for AppError {
    fn from(err: MarksError) -> Self {
        match err {
            MarksError::Repository(e) => e,
            other => AppError::NotFound(other.to_string()),
        }
    }
}

// =============================================================================
// Service Implementation
// =============================================================================

/// MarksService implementation generic over its repositories.
pub struct MarksServiceImpl<E, C, S, M>
where
    E: ExamRepository,
    C: ClassRepository,
    S: StudentRepository,
    M: MarkRepository,
{
    exam_repo: Arc<E>,
    class_repo: Arc<C>,
    student_repo: Arc<S>,
    mark_repo: Arc<M>,
}

impl<E, C, S, M> MarksServiceImpl<E, C, S, M>
where
    E: ExamRepository,
    C: ClassRepository,
    S: StudentRepository,
    M: MarkRepository,
{
    /// Create a new MarksServiceImpl.
    pub fn new(
        exam_repo: Arc<E>,
        class_repo: Arc<C>,
        student_repo: Arc<S>,
        mark_repo: Arc<M>,
    ) -> Self {
        Self {
            exam_repo,
            class_repo,
            student_repo,
            mark_repo,
        }
    }

    async fn ensure_exam(&self, tenant: &TenantContext, exam_id: i64) -> Result<(), MarksError> {
        self.exam_repo
            .find_by_id(tenant.school_id, exam_id)
            .await?
            .ok_or(MarksError::ExamNotFound)?;
        Ok(())
    }

    /// Papers of the exam for the class; an empty set is an error.
    async fn applicable_papers(
        &self,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<ExamPaper>, MarksError> {
        let papers = self.exam_repo.papers_for_class(exam_id, class_id).await?;
        if papers.is_empty() {
            return Err(MarksError::ClassNotInExam);
        }
        Ok(papers)
    }

    /// Create missing mark rows, then read them back grouped by student.
    async fn provision(
        &self,
        exam_id: i64,
        students: &[Student],
        papers: &[ExamPaper],
    ) -> Result<Vec<StudentMarks>, MarksError> {
        let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        let paper_ids: Vec<i64> = papers.iter().map(|p| p.id).collect();

        let created = self.mark_repo.ensure_marks(&student_ids, &paper_ids).await?;
        if created > 0 {
            metrics::record_mark_rows_provisioned(created);
            tracing::info!(
                exam_id,
                students = student_ids.len(),
                papers = paper_ids.len(),
                created,
                "Provisioned mark rows"
            );
        }

        let entries = self.mark_repo.find_entries(&student_ids, &paper_ids).await?;
        Ok(group_marks(students, entries))
    }
}

#[async_trait]
impl<E, C, S, M> MarksService for MarksServiceImpl<E, C, S, M>
where
    E: ExamRepository + 'static,
    C: ClassRepository + 'static,
    S: StudentRepository + 'static,
    M: MarkRepository + 'static,
{
    async fn marks_for_class(
        &self,
        tenant: &TenantContext,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<StudentMarks>, MarksError> {
        self.ensure_exam(tenant, exam_id).await?;
        self.class_repo
            .find_by_id(tenant.school_id, class_id)
            .await?
            .ok_or(MarksError::ClassNotFound)?;

        let papers = self.applicable_papers(exam_id, class_id).await?;
        let students = self.student_repo.list(tenant.school_id, Some(class_id)).await?;

        self.provision(exam_id, &students, &papers).await
    }

    async fn marks_for_enrollment(
        &self,
        tenant: &TenantContext,
        exam_id: i64,
        enrollment_id: &str,
    ) -> Result<StudentMarks, MarksError> {
        self.ensure_exam(tenant, exam_id).await?;
        let student = self
            .student_repo
            .find_by_enrollment_id(tenant.school_id, enrollment_id)
            .await?
            .ok_or(MarksError::StudentNotFound)?;

        let papers = self.applicable_papers(exam_id, student.class_id).await?;

        self.provision(exam_id, std::slice::from_ref(&student), &papers)
            .await?
            .into_iter()
            .next()
            .ok_or(MarksError::StudentNotFound)
    }

    async fn exam_papers(
        &self,
        tenant: &TenantContext,
        exam_id: i64,
        class_id: i64,
    ) -> Result<Vec<ExamPaper>, MarksError> {
        self.ensure_exam(tenant, exam_id).await?;
        self.class_repo
            .find_by_id(tenant.school_id, class_id)
            .await?
            .ok_or(MarksError::ClassNotFound)?;

        Ok(self.exam_repo.papers_for_class(exam_id, class_id).await?)
    }

    async fn update_marks(
        &self,
        tenant: &TenantContext,
        student_id: i64,
        edits: Vec<MarkEdit>,
    ) -> Result<u64, MarksError> {
        self.student_repo
            .find_by_id(tenant.school_id, student_id)
            .await?
            .ok_or(MarksError::StudentNotFound)?;

        match self.mark_repo.update_marks(student_id, &edits).await? {
            MarkUpdateOutcome::Applied(written) => {
                tracing::info!(student_id, written, "Updated marks");
                Ok(written)
            }
            MarkUpdateOutcome::Missing { paper_id } => Err(MarksError::MarkNotFound { paper_id }),
        }
    }
}
