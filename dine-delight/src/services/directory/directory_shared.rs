use std::sync::Arc;

use dine_core::ServiceCapabilities;

use crate::services::App;

use super::directory_hooks::{ValidateSubscription, ValidateUser, ValidateUserRole};

pub fn capabilities() -> ServiceCapabilities {
    ServiceCapabilities::internal()
}

pub fn register_hooks(app: &App) -> anyhow::Result<()> {
    app.service("user_roles")?.hooks(|h| {
        h.before_create(Arc::new(ValidateUserRole));
        h.before_update(Arc::new(ValidateUserRole));
    });
    app.service("subscriptions")?.hooks(|h| {
        h.before_create(Arc::new(ValidateSubscription));
        h.before_update(Arc::new(ValidateSubscription));
    });
    app.service("users")?.hooks(|h| {
        h.before_create(Arc::new(ValidateUser));
        h.before_update(Arc::new(ValidateUser));
    });
    Ok(())
}
