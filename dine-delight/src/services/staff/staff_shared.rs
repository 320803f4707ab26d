use std::sync::Arc;

use dine_core::ServiceCapabilities;

use crate::services::access::RequireTenantAccess;
use crate::services::App;

pub fn capabilities() -> ServiceCapabilities {
    ServiceCapabilities::standard_crud()
}

pub fn register_hooks(app: &App) -> anyhow::Result<()> {
    app.service("staff")?.hooks(|h| {
        h.before_all(Arc::new(RequireTenantAccess));

        h.before_create(Arc::new(super::staff_hooks::ValidateStaffMember::full()));
        h.before_update(Arc::new(super::staff_hooks::ValidateStaffMember::full()));
        h.before_patch(Arc::new(super::staff_hooks::ValidateStaffMember::partial()));
    });
    Ok(())
}
