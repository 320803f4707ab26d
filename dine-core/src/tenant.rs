//! Core multi-tenant types.

use std::fmt;

/// Reserved id of the global (service-role) context.
pub const GLOBAL_TENANT: &str = "*";

/// A tenant identifier (the tenant row id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(pub String);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context carried with every operation.
///
/// Passed into services and hooks so that all logic is explicitly
/// tenant-aware. The global context is used by privileged, cross-tenant
/// work (seeding, platform listings) and is never derived from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

impl TenantContext {
    /// Convenience constructor from a string.
    pub fn new<S: Into<String>>(tenant: S) -> Self {
        Self {
            tenant_id: TenantId(tenant.into()),
        }
    }

    /// The cross-tenant context.
    pub fn global() -> Self {
        Self::new(GLOBAL_TENANT)
    }

    pub fn is_global(&self) -> bool {
        self.tenant_id.0 == GLOBAL_TENANT
    }

    pub fn as_str(&self) -> &str {
        &self.tenant_id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_context_is_distinct_from_tenants() {
        assert!(TenantContext::global().is_global());
        assert!(!TenantContext::new("b3c1").is_global());
        assert_eq!(TenantContext::new("b3c1").as_str(), "b3c1");
    }
}
