//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **TenantContext**: The school a request acts for

mod tenant;

pub use tenant::*;
