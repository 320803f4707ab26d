use std::sync::Arc;

use dine_auth::{AuthOptions, JwtIdentityResolver};

use crate::services::App;

/// Shared state for the hand-written routes.
#[derive(Clone)]
pub struct AppContext {
    pub app: App,
    pub base_domain: String,
    pub auth: AuthOptions,
    pub identities: Arc<JwtIdentityResolver>,
}

impl AppContext {
    pub fn new(app: App, identities: Arc<JwtIdentityResolver>) -> Self {
        let cfg = app.config_snapshot();
        let base_domain = cfg
            .get_string("tenancy.base_domain")
            .unwrap_or_else(|| "localhost".to_string());
        let auth = AuthOptions::from_config(&cfg);

        Self {
            app,
            base_domain,
            auth,
            identities,
        }
    }
}
