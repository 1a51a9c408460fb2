//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type, always filtered by the caller's school.
//!
//! ## Available Repositories
//!
//! - **StudentRepository** - Enrollment, promotion and roll numbers
//! - **ClassRepository** - Class lookups (monthly fee)
//! - **ExamRepository** - Exams and the papers applicable to a class
//! - **MarkRepository** - Idempotent mark provisioning and score edits
//! - **ReceiptRepository** - Receipts with transactional carry-forward
//! - **MonthRepository** - Seeded calendar months
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgMarkRepository, PgStudentRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let student_repo = PgStudentRepository::new(pool.clone());
//!     let mark_repo = PgMarkRepository::new(pool.clone());
//! }
//! ```

pub mod class_repository;
pub mod exam_repository;
pub mod mark_repository;
pub mod month_repository;
pub mod receipt_repository;
pub mod student_repository;

pub use class_repository::PgClassRepository;
pub use exam_repository::PgExamRepository;
pub use mark_repository::PgMarkRepository;
pub use month_repository::PgMonthRepository;
pub use receipt_repository::PgReceiptRepository;
pub use student_repository::PgStudentRepository;
