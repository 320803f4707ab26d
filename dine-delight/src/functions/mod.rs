//! Platform functions: CORS-open JSON endpoints with their own response
//! shapes, mounted under `/functions/v1`.

use std::collections::HashMap;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use dine_axum::layers::open_cors;

use crate::context::AppContext;

pub mod error;
pub mod grant_super_admin;
pub mod seed_demo_data;
pub mod super_admin_tenants;

pub use error::FunctionError;
pub use seed_demo_data::{seed_demo, SeedReport};
pub use super_admin_tenants::{list_tenants, TenantSummary};

pub(crate) fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect()
}

/// Plain `OPTIONS` without CORS request headers still gets a 200.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub fn router(ctx: AppContext) -> Router<()> {
    Router::new()
        .route(
            "/grant-super-admin",
            post(grant_super_admin::handler).options(preflight),
        )
        .route(
            "/super-admin-tenants",
            post(super_admin_tenants::handler).options(preflight),
        )
        .route(
            "/seed-demo-data",
            post(seed_demo_data::handler).options(preflight),
        )
        .layer(open_cors())
        .with_state(ctx)
}
