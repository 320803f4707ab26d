use axum::http::HeaderMap;
use dine_auth::Identity;
use dine_axum::rest::TENANT_HEADER;
use dine_core::errors::DineError;
use dine_core::TenantContext;

use crate::models::{from_row, Role, Tenant};
use crate::services::access::{can_manage_tenant, has_role};
use crate::services::{internal_params, App, ParamsExt};

fn requested(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

async fn first_tenant(app: &App, query: crate::services::DineParams) -> anyhow::Result<Option<Tenant>> {
    let rows = app
        .service("tenants")?
        .find(TenantContext::global(), query)
        .await?;
    rows.into_iter()
        .next()
        .map(|row| from_row("tenants", row))
        .transpose()
}

/// The restaurant an admin request works on.
///
/// `x-tenant-id` picks one explicitly (super admins may pick any).
/// Otherwise the caller's own restaurant, then one their role is
/// scoped to.
pub async fn admin_tenant(app: &App, identity: &Identity, headers: &HeaderMap) -> anyhow::Result<Tenant> {
    let user_id = identity.user_id.as_str();
    let tenants = app.service("tenants")?;
    let user_roles = app.service("user_roles")?;

    if let Some(tenant_id) = requested(headers) {
        let allowed = has_role(&user_roles, user_id, Role::SuperAdmin).await?
            || can_manage_tenant(&tenants, &user_roles, user_id, &tenant_id).await?;
        if !allowed {
            return Err(DineError::forbidden("You do not have access to this restaurant").into_anyhow());
        }
        let row = tenants
            .get(TenantContext::global(), &tenant_id, internal_params())
            .await?;
        return from_row("tenants", row);
    }

    if let Some(tenant) = first_tenant(app, internal_params().eq("owner_id", user_id)).await? {
        return Ok(tenant);
    }

    let scoped = user_roles
        .find(TenantContext::global(), internal_params().eq("user_id", user_id))
        .await?;
    let scoped_ids: Vec<&str> = scoped
        .iter()
        .filter_map(|r| r.get("tenant_id").and_then(|t| t.as_str()))
        .collect();
    if !scoped_ids.is_empty() {
        if let Some(tenant) = first_tenant(app, internal_params().is_in("id", &scoped_ids)).await? {
            return Ok(tenant);
        }
    }

    Err(DineError::not_found("No restaurant is linked to this account").into_anyhow())
}
