//! # Domain Entities
//!
//! Core domain entities representing the main business objects of a school.
//! All entities map directly to their corresponding database tables.
//!
//! ## Core Entities
//!
//! - **Student**: Enrolled pupil with enrollment id, class and roll number
//! - **Class**: A class within a school, carrying its monthly fee
//! - **Exam / ExamPaper**: An examination and its per-subject papers
//! - **ObtainedMark**: A student's score on one paper
//! - **Receipt**: A fee payment with carry-forward balance
//!
//! ## Supporting Entities
//!
//! - **Month**: Calendar months a receipt covers
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod class;
mod exam;
mod mark;
mod month;
mod receipt;
mod student;

pub use class::{Class, ClassRepository};
pub use exam::{Exam, ExamPaper, ExamRepository};
pub use mark::{MarkEdit, MarkEntry, MarkRepository, MarkUpdateOutcome, ObtainedMark};
pub use month::{Month, MonthRepository};
pub use receipt::{FeeComponents, NewReceipt, Receipt, ReceiptRepository, RecordedReceipt};
pub use student::{NewStudent, Student, StudentRepository};

#[cfg(test)]
pub use receipt::MockReceiptRepository;
#[cfg(test)]
pub use student::MockStudentRepository;
