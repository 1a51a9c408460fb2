//! Tenant context.
//!
//! Every tenant-owned query is filtered by the school of the authenticated
//! administrator. The context is built once per request by the auth
//! middleware and passed explicitly into services and repositories.

use serde::{Deserialize, Serialize};

/// The authenticated school and administrator for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// School all reads and writes are scoped to
    pub school_id: i64,

    /// Administrator acting on behalf of the school
    pub admin_id: i64,
}

impl TenantContext {
    pub fn new(school_id: i64, admin_id: i64) -> Self {
        Self {
            school_id,
            admin_id,
        }
    }

    /// Whether a row owned by `school_id` is visible to this tenant.
    pub fn owns(&self, school_id: i64) -> bool {
        self.school_id == school_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owns_only_its_own_school() {
        let tenant = TenantContext::new(7, 1);
        assert!(tenant.owns(7));
        assert!(!tenant.owns(8));
    }
}
