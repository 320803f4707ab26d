//! Dine Delight: multi-tenant restaurant ordering.
//!
//! Subdomain storefronts, a guarded kitchen/admin surface, REST data
//! services and a few platform functions, on one axum router.

pub mod admin;
pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod functions;
pub mod hooks;
pub mod models;
pub mod money;
pub mod services;
pub mod storefront;

use std::sync::Arc;

use anyhow::Result;
use dine_axum::{axum, AxumApp};
use serde_json::Value;

use crate::context::AppContext;
use crate::services::{DineParams, DineState};

pub fn build() -> Result<AxumApp<Value, DineParams>> {
    build_with_state(Arc::new(DineState::default()))
}

pub fn build_with_state(state: Arc<DineState>) -> Result<AxumApp<Value, DineParams>> {
    let (dine, identities) = app::dine_app();
    let svcs = services::configure(&dine, state)?;
    let ctx = AppContext::new(dine.clone(), identities);

    let ax = axum(dine)
        .use_service("/tenants", svcs.tenants)
        .use_service("/menu_items", svcs.menu_items)
        .use_service("/orders", svcs.orders)
        .use_service("/staff", svcs.staff)
        .merge(storefront::routes::router(ctx.clone()))
        .merge(auth::router(ctx.clone()))
        .use_router("/app", admin::router(ctx.clone()))
        .use_router("/functions/v1", functions::router(ctx))
        .use_get("/health", || async { "ok" });

    Ok(ax)
}
