use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use dine_auth::Session;
use dine_axum::DineAxumError;
use dine_core::TenantContext;
use serde::Serialize;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::models::{from_row, MenuItem, Order};
use crate::money::Money;
use crate::services::{internal_params, App};

use super::tenant::admin_tenant;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    pub open_orders: usize,
    pub revenue: Money,
    pub menu_items: usize,
    pub available_items: usize,
    pub staff_members: usize,
}

pub async fn tenant_orders(app: &App, tenant_id: &str) -> anyhow::Result<Vec<Order>> {
    app.service("orders")?
        .find(TenantContext::new(tenant_id), internal_params())
        .await?
        .into_iter()
        .map(|row| from_row("orders", row))
        .collect()
}

pub async fn stats(app: &App, tenant_id: &str) -> anyhow::Result<DashboardStats> {
    let scope = TenantContext::new(tenant_id);

    let orders = tenant_orders(app, tenant_id).await?;
    let items: Vec<MenuItem> = app
        .service("menu_items")?
        .find(scope.clone(), internal_params())
        .await?
        .into_iter()
        .map(|row| from_row("menu_items", row))
        .collect::<anyhow::Result<_>>()?;
    let staff = app.service("staff")?.find(scope, internal_params()).await?;

    Ok(DashboardStats {
        total_orders: orders.len(),
        open_orders: orders.iter().filter(|o| o.status.is_open()).count(),
        revenue: orders.iter().map(|o| o.total_amount).sum(),
        menu_items: items.len(),
        available_items: items.iter().filter(|i| i.is_available).count(),
        staff_members: staff.len(),
    })
}

pub async fn handler(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Json<Value>, DineAxumError> {
    let tenant = admin_tenant(&ctx.app, &session.identity, &headers).await?;
    let stats = stats(&ctx.app, &tenant.id).await?;

    Ok(Json(json!({
        "tenant": { "id": tenant.id, "name": tenant.name, "slug": tenant.slug },
        "user": session.identity,
        "stats": stats,
    })))
}
