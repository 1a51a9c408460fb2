//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **MarksService**: Mark provisioning, grouping and score edits
//! - **ReceiptService**: Receipts with balance carry-forward
//! - **StudentService**: Enrollment, promotion and roll numbers

pub mod marks_service;
pub mod receipt_service;
pub mod student_service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export marks service types
pub use marks_service::{MarksError, MarksService, MarksServiceImpl};

// Re-export receipt service types
pub use receipt_service::{
    CreateReceiptDto, ReceiptContext, ReceiptError, ReceiptService, ReceiptServiceImpl,
};

// Re-export student service types
pub use student_service::{CreateStudentDto, StudentError, StudentService, StudentServiceImpl};
