use std::collections::{BTreeSet, HashMap};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use dine_auth::{authorize, SUPER_ADMIN_ROLE};
use dine_core::TenantContext;
use serde::Serialize;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::models::{from_row, Subscription, Tenant, User};
use crate::services::access::ServiceRoleLookup;
use crate::services::{internal_params, App, ParamsExt};

use super::error::FunctionError;
use super::header_map;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TenantSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub owner_email: Option<String>,
    pub subscription_plan: Option<String>,
    pub subscription_status: Option<String>,
}

fn decode<T: serde::de::DeserializeOwned>(table: &str, rows: Vec<Value>) -> anyhow::Result<Vec<T>> {
    rows.into_iter().map(|row| from_row(table, row)).collect()
}

/// Every tenant with its owner's email and subscription.
///
/// One batched lookup per related table, joined by id in memory.
pub async fn list_tenants(app: &App) -> anyhow::Result<Vec<TenantSummary>> {
    let tenants: Vec<Tenant> = decode(
        "tenants",
        app.service("tenants")?.find(TenantContext::global(), internal_params()).await?,
    )?;

    let tenant_ids: Vec<&str> = tenants.iter().map(|t| t.id.as_str()).collect();
    let subscriptions: Vec<Subscription> = decode(
        "subscriptions",
        app.service("subscriptions")?
            .find(TenantContext::global(), internal_params().is_in("tenant_id", &tenant_ids))
            .await?,
    )?;
    let subs_by_tenant: HashMap<String, Subscription> = subscriptions
        .into_iter()
        .map(|s| (s.tenant_id.clone(), s))
        .collect();

    let owner_ids: BTreeSet<&str> = tenants.iter().map(|t| t.owner_id.as_str()).collect();
    let owners: Vec<User> = decode(
        "users",
        app.service("users")?
            .find(TenantContext::global(), internal_params().is_in("id", &owner_ids))
            .await?,
    )?;
    let email_by_owner: HashMap<String, String> =
        owners.into_iter().map(|u| (u.id, u.email)).collect();

    Ok(tenants
        .into_iter()
        .map(|t| {
            let sub = subs_by_tenant.get(&t.id);
            TenantSummary {
                owner_email: email_by_owner.get(&t.owner_id).cloned(),
                subscription_plan: sub.map(|s| s.plan.clone()),
                subscription_status: sub.map(|s| s.status.clone()),
                id: t.id,
                name: t.name,
                slug: t.slug,
                logo_url: t.logo_url,
            }
        })
        .collect())
}

pub async fn handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
) -> Result<Json<Value>, FunctionError> {
    let roles = ServiceRoleLookup {
        app: ctx.app.clone(),
    };
    authorize(
        ctx.identities.as_ref(),
        &roles,
        &header_map(&headers),
        SUPER_ADMIN_ROLE,
    )
    .await?;

    let tenants = list_tenants(&ctx.app).await?;
    Ok(Json(json!({ "tenants": tenants })))
}
