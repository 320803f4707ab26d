use dine_auth::{DEFAULT_AUDIENCE, DEFAULT_JWT_SECRET, DEFAULT_LOGIN_PATH};

use crate::services::App;

pub const ENV_PREFIX: &str = "DINE__";

/// Defaults first, then `DINE__*` environment overrides
/// (`DINE__HTTP__PORT=8080` sets `http.port`).
pub fn config(app: &App) {
    configure_http(app);
    configure_tenancy(app);
    configure_auth(app);
    app.set("demo.seed_on_start", "false");

    let loaded = app.load_env(ENV_PREFIX);
    tracing::debug!(loaded, "config overrides from environment");
}

fn configure_http(app: &App) {
    app.set("http.host", "127.0.0.1");
    app.set("http.port", "3030");
}

/// Storefronts live at `<slug>.<base_domain>`.
fn configure_tenancy(app: &App) {
    app.set("tenancy.base_domain", "localhost");
}

fn configure_auth(app: &App) {
    app.set("auth.jwt.secret", DEFAULT_JWT_SECRET);
    app.set("auth.jwt.audience", DEFAULT_AUDIENCE);
    app.set("auth.login_path", DEFAULT_LOGIN_PATH);
}
