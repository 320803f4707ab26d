use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dine_core::errors::ErrorKind;
use dine_core::{DineError, TenantContext};
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::services::{internal_params, App, ParamsExt};

use super::error::upstream_message;

pub const DEMO_SLUG: &str = "demo-burger";
pub const DEMO_NAME: &str = "Burger King Demo";
pub const DEMO_OWNER: &str = "00000000-0000-0000-0000-000000000000";
pub const SEEDED_MESSAGE: &str = "Demo data seeded successfully!";

/// (name, description, price, category)
const DEMO_ITEMS: [(&str, &str, f64, &str); 5] = [
    ("Burger", "Juicy beef burger with melted cheese, lettuce, and tomatoes", 12.99, "Mains"),
    ("Pasta", "Creamy carbonara with parmesan and herbs", 14.99, "Mains"),
    ("Wings", "Crispy chicken wings with your choice of sauce", 9.99, "Starters"),
    ("Salad", "Fresh Caesar salad with croutons and parmesan", 8.99, "Starters"),
    ("Fries", "Golden crispy French fries", 4.99, "Sides"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedReport {
    pub tenant_id: String,
    pub items_count: usize,
}

async fn demo_tenant_id(app: &App) -> anyhow::Result<Option<String>> {
    let rows = app
        .service("tenants")?
        .find(TenantContext::global(), internal_params().eq("slug", DEMO_SLUG))
        .await?;
    Ok(rows
        .first()
        .and_then(|t| t.get("id"))
        .and_then(|id| id.as_str())
        .map(str::to_string))
}

/// Keep the existing demo tenant, or create it. A create that loses a
/// race on the slug falls back to the winner's row.
async fn upsert_demo_tenant(app: &App) -> anyhow::Result<String> {
    if let Some(id) = demo_tenant_id(app).await? {
        return Ok(id);
    }

    let created = app
        .service("tenants")?
        .create(
            TenantContext::global(),
            json!({ "name": DEMO_NAME, "slug": DEMO_SLUG, "owner_id": DEMO_OWNER }),
            internal_params(),
        )
        .await;

    match created {
        Ok(row) => row
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Failed to create or fetch tenant")),
        Err(err) if DineError::kind_of(&err) == ErrorKind::Conflict => demo_tenant_id(app)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create or fetch tenant")),
        Err(err) => Err(err),
    }
}

/// Demo tenant plus exactly the fixed menu, however often it runs.
pub async fn seed_demo(app: &App) -> anyhow::Result<SeedReport> {
    let tenant_id = upsert_demo_tenant(app).await?;
    let scope = TenantContext::new(tenant_id.clone());
    let menu_items = app.service("menu_items")?;

    menu_items
        .remove(
            scope.clone(),
            None,
            internal_params().eq("tenant_id", tenant_id.clone()),
        )
        .await?;

    for (name, description, price, category) in DEMO_ITEMS {
        menu_items
            .create(
                scope.clone(),
                json!({
                    "tenant_id": tenant_id,
                    "name": name,
                    "description": description,
                    "price": price,
                    "category": category,
                    "is_available": true,
                }),
                internal_params(),
            )
            .await?;
    }

    tracing::info!(%tenant_id, items = DEMO_ITEMS.len(), "demo data seeded");
    Ok(SeedReport {
        tenant_id,
        items_count: DEMO_ITEMS.len(),
    })
}

pub async fn handler(State(ctx): State<AppContext>) -> Response {
    match seed_demo(&ctx.app).await {
        Ok(report) => Json(json!({
            "success": true,
            "message": SEEDED_MESSAGE,
            "tenant_id": report.tenant_id,
            "items_count": report.items_count,
        }))
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "demo seeding failed");
            let body: Value = json!({ "success": false, "error": upstream_message(&err) });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
    }
}
