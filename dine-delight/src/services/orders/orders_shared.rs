use std::sync::Arc;

use dine_core::{ServiceCapabilities, ServiceMethodKind};

use crate::services::access::RequireTenantAccess;
use crate::services::App;

/// Orders are never replaced wholesale; status moves through `patch`.
pub fn capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethodKind::Find,
        ServiceMethodKind::Get,
        ServiceMethodKind::Create,
        ServiceMethodKind::Patch,
        ServiceMethodKind::Remove,
    ])
}

pub fn register_hooks(app: &App) -> anyhow::Result<()> {
    app.service("orders")?.hooks(|h| {
        h.before_all(Arc::new(RequireTenantAccess));

        h.before_create(Arc::new(super::orders_hooks::ValidateOrder));
        h.before_patch(Arc::new(super::orders_hooks::ValidateOrderPatch));
    });
    Ok(())
}
