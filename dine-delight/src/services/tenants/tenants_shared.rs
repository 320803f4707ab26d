use std::sync::Arc;

use dine_core::{ServiceCapabilities, ServiceMethodKind};

use crate::services::access::ScopeTenantsToOwner;
use crate::services::App;

/// The slug is the subdomain key.
pub const UNIQUE: &[&str] = &["slug"];

pub fn capabilities() -> ServiceCapabilities {
    ServiceCapabilities::standard_crud()
}

pub fn register_hooks(app: &App) -> anyhow::Result<()> {
    app.service("tenants")?.hooks(|h| {
        h.before_all(Arc::new(ScopeTenantsToOwner));

        h.before_create(Arc::new(super::tenants_hooks::ValidateTenant));
        h.before_update(Arc::new(super::tenants_hooks::ValidateTenant));
        h.before(ServiceMethodKind::Patch, Arc::new(super::tenants_hooks::ValidateTenantPatch));
    });
    Ok(())
}
