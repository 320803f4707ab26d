use std::sync::Arc;

use dine_auth::{AuthOptions, JwtIdentityResolver};
use dine_core::DineApp;

use crate::services::App;

/// A configured app with the global hooks in place.
pub fn dine_app() -> (App, Arc<JwtIdentityResolver>) {
    let app: App = DineApp::new();
    crate::config::config(&app);

    let auth = AuthOptions::from_config(&app.config_snapshot());
    let identities = Arc::new(JwtIdentityResolver::new(auth.jwt));
    crate::hooks::global_hooks(&app, identities.clone());

    (app, identities)
}
