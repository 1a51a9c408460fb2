//! Student entity and repository trait.
//!
//! Maps to the `students` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents an enrolled student.
///
/// Maps to the `students` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - school_id: BIGINT NOT NULL REFERENCES schools(id)
/// - enrollment_id: VARCHAR(50) NOT NULL, UNIQUE (school_id, enrollment_id)
/// - first_name: VARCHAR(100) NOT NULL
/// - middle_name: VARCHAR(100) NULL
/// - last_name: VARCHAR(100) NULL
/// - class_id: BIGINT NOT NULL REFERENCES classes(id)
/// - roll_no: INTEGER NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,

    /// Owning school (tenant)
    pub school_id: i64,

    /// Immutable enrollment identifier, distinct from the roll number
    pub enrollment_id: String,

    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,

    /// Current class of admission
    pub class_id: i64,

    /// Display ordering within the class
    pub roll_no: i32,

    pub created_at: DateTime<Utc>,
}

impl Student {
    /// First, middle and last name joined by single spaces.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Fields required to insert a student.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub school_id: i64,
    pub enrollment_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub class_id: i64,
    pub roll_no: i32,
}

/// Repository trait for Student data access operations.
///
/// Every method is scoped to a school.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find a student by primary key.
    async fn find_by_id(&self, school_id: i64, id: i64) -> Result<Option<Student>, AppError>;

    /// Find a student by enrollment identifier.
    async fn find_by_enrollment_id(
        &self,
        school_id: i64,
        enrollment_id: &str,
    ) -> Result<Option<Student>, AppError>;

    /// Find every student in `ids` that belongs to the school.
    async fn find_by_ids(&self, school_id: i64, ids: &[i64]) -> Result<Vec<Student>, AppError>;

    /// List students ordered by first name, optionally restricted to a class.
    async fn list(&self, school_id: i64, class_id: Option<i64>) -> Result<Vec<Student>, AppError>;

    /// Count students currently in a class.
    async fn count_by_class(&self, school_id: i64, class_id: i64) -> Result<i64, AppError>;

    /// Insert a student. A duplicate enrollment id is a validation error.
    async fn create(&self, student: &NewStudent) -> Result<Student, AppError>;

    /// Move students to another class, keeping their roll numbers.
    async fn move_to_class(
        &self,
        school_id: i64,
        ids: &[i64],
        class_id: i64,
    ) -> Result<u64, AppError>;

    /// Overwrite roll numbers in a single transaction.
    async fn set_roll_numbers(
        &self,
        school_id: i64,
        assignments: &[(i64, i32)],
    ) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(first: &str, middle: Option<&str>, last: Option<&str>) -> Student {
        Student {
            id: 1,
            school_id: 1,
            enrollment_id: "ENR-1".into(),
            first_name: first.into(),
            middle_name: middle.map(Into::into),
            last_name: last.map(Into::into),
            class_id: 1,
            roll_no: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_name_skips_missing_parts() {
        assert_eq!(student("Asha", None, Some("Rao")).full_name(), "Asha Rao");
        assert_eq!(student("Asha", Some(" "), None).full_name(), "Asha");
        assert_eq!(
            student("Asha", Some("K"), Some("Rao")).full_name(),
            "Asha K Rao"
        );
    }
}
