use std::sync::Arc;

use dine_core::ServiceCapabilities;

use crate::services::access::RequireTenantAccess;
use crate::services::App;

pub fn capabilities() -> ServiceCapabilities {
    ServiceCapabilities::standard_crud()
}

pub fn register_hooks(app: &App) -> anyhow::Result<()> {
    app.service("menu_items")?.hooks(|h| {
        h.before_all(Arc::new(RequireTenantAccess));

        h.before_create(Arc::new(super::menu_items_hooks::ValidateMenuItem));
        h.before_update(Arc::new(super::menu_items_hooks::ValidateMenuItem));
        h.before_patch(Arc::new(super::menu_items_hooks::ValidateMenuItemPatch));
    });
    Ok(())
}
