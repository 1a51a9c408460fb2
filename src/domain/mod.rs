//! # Domain Layer
//!
//! The domain layer contains the core business logic of the school backend.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (Student, Class, Exam, Receipt, etc.)
//! - **value_objects**: Immutable value types (TenantContext)
//! - **services**: Fee settlement, marks grouping and roll-number rules
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure business logic and domain rules
//! - Repository traits define data access contracts
//! - Every tenant-owned lookup takes the school id explicitly

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
