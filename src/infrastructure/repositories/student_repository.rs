//! Student Repository Implementation
//!
//! PostgreSQL implementation of the StudentRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewStudent, Student, StudentRepository};
use crate::shared::error::AppError;

/// Database row representation matching the students table schema.
#[derive(Debug, sqlx::FromRow)]
struct StudentRow {
    id: i64,
    school_id: i64,
    enrollment_id: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: Option<String>,
    class_id: i64,
    roll_no: i32,
    created_at: DateTime<Utc>,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.id,
            school_id: row.school_id,
            enrollment_id: row.enrollment_id,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            class_id: row.class_id,
            roll_no: row.roll_no,
            created_at: row.created_at,
        }
    }
}

const STUDENT_COLUMNS: &str = "id, school_id, enrollment_id, first_name, middle_name, last_name, \
                               class_id, roll_no, created_at";

/// PostgreSQL student repository implementation.
#[derive(Clone)]
pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
    /// Create a new PgStudentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = $1 AND id = $2"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Student::from))
    }

    async fn find_by_enrollment_id(
        &self,
        school_id: i64,
        enrollment_id: &str,
    ) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = $1 AND enrollment_id = $2"
        ))
        .bind(school_id)
        .bind(enrollment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Student::from))
    }

    async fn find_by_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<Student>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE school_id = $1 AND id = ANY($2)
            ORDER BY id
            "#
        ))
        .bind(school_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn list(&self, school_id: i64, class_id: Option<i64>) -> Result<Vec<Student>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM students
            WHERE school_id = $1 AND ($2::BIGINT IS NULL OR class_id = $2)
            ORDER BY first_name, id
            "#
        ))
        .bind(school_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn count_by_class(&self, school_id: i64, class_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE school_id = $1 AND class_id = $2",
        )
        .bind(school_id)
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create(&self, student: &NewStudent) -> Result<Student, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            INSERT INTO students
                (school_id, enrollment_id, first_name, middle_name, last_name, class_id, roll_no)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(student.school_id)
        .bind(&student.enrollment_id)
        .bind(&student.first_name)
        .bind(&student.middle_name)
        .bind(&student.last_name)
        .bind(student.class_id)
        .bind(student.roll_no)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::invalid_field(
                    "enrollment_id",
                    "A student with this enrollment id already exists",
                )
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound("Class not found".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into())
    }

    async fn move_to_class(
        &self,
        school_id: i64,
        ids: &[i64],
        class_id: i64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE students SET class_id = $3 WHERE school_id = $1 AND id = ANY($2)",
        )
        .bind(school_id)
        .bind(ids)
        .bind(class_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn set_roll_numbers(
        &self,
        school_id: i64,
        assignments: &[(i64, i32)],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (student_id, roll_no) in assignments {
            sqlx::query("UPDATE students SET roll_no = $3 WHERE school_id = $1 AND id = $2")
                .bind(school_id)
                .bind(student_id)
                .bind(roll_no)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
