use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use dine_auth::authenticate_headers;
use dine_core::TenantContext;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::models::Role;
use crate::services::{internal_params, App, ParamsExt};

use super::error::FunctionError;
use super::header_map;

/// Replace every role `user_id` holds with a single global super admin
/// role. Running it again leaves the same single row.
pub async fn grant_super_admin(app: &App, user_id: &str) -> anyhow::Result<Value> {
    let user_roles = app.service("user_roles")?;

    user_roles
        .remove(
            TenantContext::global(),
            None,
            internal_params().eq("user_id", user_id),
        )
        .await?;

    user_roles
        .create(
            TenantContext::global(),
            json!({
                "user_id": user_id,
                "role": Role::SuperAdmin.as_str(),
                "tenant_id": null,
            }),
            internal_params(),
        )
        .await
}

pub async fn handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<Json<Value>, FunctionError> {
    let identity = authenticate_headers(ctx.identities.as_ref(), &header_map(&headers)).await?;

    grant_super_admin(&ctx.app, &identity.user_id).await?;
    tracing::info!(user = %identity.user_id, "granted super admin");

    Ok(Json(json!({ "success": true })))
}
