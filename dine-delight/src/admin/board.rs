//! Kitchen board: orders in status columns, moved one step at a time.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use dine_auth::Session;
use dine_axum::DineAxumError;
use dine_core::errors::DineError;
use dine_core::TenantContext;
use serde::Serialize;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::models::{from_row, Order, OrderStatus};
use crate::services::{internal_params, App};

use super::dashboard::tenant_orders;
use super::tenant::admin_tenant;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardColumn {
    pub status: OrderStatus,
    pub title: &'static str,
    pub orders: Vec<Order>,
}

/// One column per status, oldest order first.
pub fn columns(mut orders: Vec<Order>) -> Vec<BoardColumn> {
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    OrderStatus::ALL
        .iter()
        .map(|status| BoardColumn {
            status: *status,
            title: status.title(),
            orders: orders.iter().filter(|o| o.status == *status).cloned().collect(),
        })
        .collect()
}

/// Move an order to the next status.
pub async fn advance_order(app: &App, tenant_id: &str, order_id: &str) -> anyhow::Result<Order> {
    let orders = app.service("orders")?;
    let scope = TenantContext::new(tenant_id);

    let current: Order = from_row(
        "orders",
        orders.get(scope.clone(), order_id, internal_params()).await?,
    )?;
    let Some(next) = current.status.next() else {
        return Err(DineError::conflict(format!("Order {order_id} is already completed")).into_anyhow());
    };

    let row = orders
        .patch(
            scope,
            Some(order_id),
            json!({ "status": next.as_str() }),
            internal_params(),
        )
        .await?;
    from_row("orders", row)
}

pub async fn handler(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Result<Json<Value>, DineAxumError> {
    let tenant = admin_tenant(&ctx.app, &session.identity, &headers).await?;
    let orders = tenant_orders(&ctx.app, &tenant.id).await?;

    Ok(Json(json!({
        "tenant_id": tenant.id,
        "columns": columns(orders),
    })))
}

pub async fn advance(
    State(ctx): State<AppContext>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, DineAxumError> {
    let tenant = admin_tenant(&ctx.app, &session.identity, &headers).await?;
    let order = advance_order(&ctx.app, &tenant.id, &order_id).await?;
    tracing::info!(tenant = %tenant.id, order = %order.id, status = %order.status, "order advanced");
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn order(id: &str, status: OrderStatus, created_at: &str) -> Order {
        Order {
            id: id.to_string(),
            tenant_id: "t1".to_string(),
            customer_name: "Sam".to_string(),
            table_number: None,
            items: Vec::new(),
            total_amount: Money::ZERO,
            status,
            created_at: Some(created_at.to_string()),
        }
    }

    #[test]
    fn groups_orders_into_the_four_columns() {
        let board = columns(vec![
            order("b", OrderStatus::New, "2026-01-01T10:05:00Z"),
            order("a", OrderStatus::New, "2026-01-01T10:00:00Z"),
            order("c", OrderStatus::Ready, "2026-01-01T09:00:00Z"),
        ]);

        let titles: Vec<_> = board.iter().map(|c| c.title).collect();
        assert_eq!(titles, ["New", "Preparing", "Ready", "Completed"]);

        let new_ids: Vec<_> = board[0].orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(new_ids, ["a", "b"]);
        assert!(board[1].orders.is_empty());
        assert_eq!(board[2].orders.len(), 1);
    }
}
