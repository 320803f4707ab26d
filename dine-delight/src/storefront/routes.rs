use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dine_axum::host::subdomain_from_headers;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::models::Tenant;

use super::cart::Cart;
use super::checkout::{submit_order, CheckoutDialog, CheckoutError, CheckoutForm};
use super::lookup::{resolve_tenant, TenantResolution};
use super::menu::load_menu;
use super::notice::Notice;

pub fn router(ctx: AppContext) -> Router<()> {
    Router::new()
        .route("/", get(storefront))
        .route("/orders/checkout", post(checkout))
        .with_state(ctx)
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found(slug: &str) -> Response {
    reply(
        StatusCode::NOT_FOUND,
        json!({
            "view": "not_found",
            "slug": slug,
            "notice": Notice::restaurant_not_found(slug),
        }),
    )
}

fn landing() -> Response {
    reply(
        StatusCode::OK,
        json!({ "view": "landing", "name": "Dine Delight" }),
    )
}

/// `Ok(None)`: no tenant label in the host.
async fn tenant_for(ctx: &AppContext, headers: &HeaderMap) -> Result<Option<Tenant>, Response> {
    let Some(slug) = subdomain_from_headers(headers, &ctx.base_domain) else {
        return Ok(None);
    };
    match resolve_tenant(&ctx.app, &slug).await {
        TenantResolution::Found(tenant) => Ok(Some(tenant)),
        TenantResolution::NotFound { slug } => Err(not_found(&slug)),
    }
}

async fn storefront(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let tenant = match tenant_for(&ctx, &headers).await {
        Ok(Some(tenant)) => tenant,
        Ok(None) => return landing(),
        Err(resp) => return resp,
    };

    let menu = load_menu(&ctx.app, &tenant.id).await;
    reply(
        StatusCode::OK,
        json!({
            "view": "menu",
            "tenant": tenant,
            "items": menu.items,
            "notice": menu.notice,
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

fn cart_json(cart: &Cart) -> Value {
    json!({ "items": cart.lines(), "total": cart.total_amount() })
}

fn unprocessable(message: String, notice: Notice) -> Response {
    reply(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": message, "notice": notice }),
    )
}

async fn checkout(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return reply(
                StatusCode::BAD_REQUEST,
                json!({ "error": rejection.body_text() }),
            )
        }
    };

    let tenant = match tenant_for(&ctx, &headers).await {
        Ok(Some(tenant)) => tenant,
        Ok(None) => return not_found(""),
        Err(resp) => return resp,
    };

    let menu = load_menu(&ctx.app, &tenant.id).await;
    if let Some(notice) = menu.notice {
        return reply(StatusCode::BAD_GATEWAY, json!({ "notice": notice }));
    }

    // Prices come from the menu, never from the request.
    let mut cart = Cart::new();
    for wanted in &req.items {
        let Some(item) = menu.items.iter().find(|i| i.id == wanted.id) else {
            return unprocessable(
                format!("Item '{}' is not on the menu", wanted.id),
                Notice::order_failed(),
            );
        };
        if wanted.quantity == 0 {
            return unprocessable(
                format!("Quantity for '{}' must be at least 1", item.name),
                Notice::order_failed(),
            );
        }
        cart.add_line(
            &item.id,
            &item.name,
            item.price,
            item.image_url.as_deref(),
            wanted.quantity,
        );
    }

    let mut dialog = CheckoutDialog {
        open: true,
        form: CheckoutForm {
            customer_name: req.customer_name,
            table_number: req.table_number.unwrap_or_default(),
        },
    };

    match submit_order(&ctx.app, &tenant.id, &mut dialog, &mut cart).await {
        Ok(done) => reply(
            StatusCode::CREATED,
            json!({
                "order": done.order,
                "notice": done.notice,
                "cart": cart_json(&cart),
                "dialog_open": dialog.open,
            }),
        ),
        Err(err) => {
            let status = match &err {
                CheckoutError::Validation
                | CheckoutError::EmptyCart
                | CheckoutError::TotalTooLarge => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::Network(cause) => {
                    tracing::warn!(tenant = %tenant.id, error = %cause, "order submission failed");
                    StatusCode::BAD_GATEWAY
                }
            };
            reply(
                status,
                json!({
                    "error": err.to_string(),
                    "notice": err.notice(),
                    "cart": cart_json(&cart),
                    "dialog_open": dialog.open,
                }),
            )
        }
    }
}
