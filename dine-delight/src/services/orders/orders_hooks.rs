use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dine_core::errors::DineError;
use dine_core::hooks::{DineBeforeHook, HookContext};
use serde_json::{Map, Value};

use crate::models::OrderStatus;
use crate::money::Money;
use crate::services::validate::{
    amount, object_mut, optional_str, present_str, required_str, Violations,
};
use crate::services::{internal_params, DineParams};

const SERVICE: &str = "Orders";

/// Table numbers may arrive as numbers; they are stored as text.
fn table_number(obj: &mut Map<String, Value>, v: &mut Violations) {
    if let Some(Value::Number(n)) = obj.get("table_number") {
        let text = n.to_string();
        obj.insert("table_number".to_string(), Value::String(text));
    }
    optional_str(obj, "table_number", v);
}

/// The line's unit price and quantity, when both are valid.
fn line(raw: &mut Value, index: usize, v: &mut Violations) -> Option<(Money, u32)> {
    let field = |name: &str| format!("items[{index}].{name}");

    let Some(obj) = raw.as_object_mut() else {
        v.add(&format!("items[{index}]"), "must be an object");
        return None;
    };

    let mut line_v = Violations::new(SERVICE);
    required_str(obj, "id", &mut line_v);
    required_str(obj, "name", &mut line_v);
    let price = amount(obj, "price", true, &mut line_v);
    optional_str(obj, "image_url", &mut line_v);

    let quantity = obj
        .get("quantity")
        .and_then(|q| q.as_u64())
        .filter(|q| *q >= 1)
        .and_then(|q| u32::try_from(q).ok());
    if quantity.is_none() {
        v.add(&field("quantity"), "must be a whole number of at least 1");
    }

    for (name, msgs) in line_v.into_fields() {
        for msg in msgs {
            v.add(&field(&name), msg);
        }
    }

    Some((price?, quantity?))
}

/// Checks the order and recomputes its total from the lines.
pub struct ValidateOrder;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateOrder {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        required_str(obj, "customer_name", &mut v);
        table_number(obj, &mut v);

        let mut total = Some(Money::ZERO);
        match obj.get_mut("items") {
            Some(Value::Array(lines)) if !lines.is_empty() => {
                for (i, raw) in lines.iter_mut().enumerate() {
                    if let Some((price, quantity)) = line(raw, i, &mut v) {
                        total = total.and_then(|t| t.checked_add(price.times(quantity)?));
                    }
                }
            }
            Some(Value::Array(_)) | None | Some(Value::Null) => v.add("items", "must not be empty"),
            Some(_) => v.add("items", "must be an array"),
        }
        match total {
            Some(total) => {
                obj.insert("total_amount".to_string(), total.to_json());
            }
            None => v.add("total_amount", "is too large"),
        }

        match obj.get("status").and_then(|s| s.as_str()) {
            None | Some("new") => {}
            Some(_) => v.add("status", "new orders start as 'new'"),
        }
        obj.insert("status".to_string(), Value::String(OrderStatus::New.as_str().to_string()));
        obj.insert("created_at".to_string(), Value::String(Utc::now().to_rfc3339()));

        v.into_result()
    }
}

/// Lines and totals are frozen; status only moves one step forward.
pub struct ValidateOrderPatch;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateOrderPatch {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        for frozen in ["items", "total_amount", "created_at"] {
            if obj.contains_key(frozen) {
                v.add(frozen, "cannot be changed");
            }
        }
        present_str(obj, "customer_name", &mut v);
        table_number(obj, &mut v);

        let next = match obj.get("status") {
            None => None,
            Some(Value::String(s)) => match s.parse::<OrderStatus>() {
                Ok(status) => Some(status),
                Err(msg) => {
                    v.add("status", msg);
                    None
                }
            },
            Some(_) => {
                v.add("status", "must be a string");
                None
            }
        };
        v.into_result()?;

        let Some(next) = next else {
            return Ok(());
        };
        let Some(id) = ctx.id.clone() else {
            return Err(DineError::bad_request("Order status changes need an order id").into_anyhow());
        };

        let current = ctx
            .services
            .service("orders")?
            .get(ctx.tenant.clone(), &id, internal_params())
            .await?;
        let current: OrderStatus = current
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| DineError::general_error(e).into_anyhow())?;

        if current == next {
            return Ok(());
        }
        if !current.can_become(next) {
            return Err(DineError::conflict(format!(
                "Order cannot move from {current} to {next}"
            ))
            .into_anyhow());
        }
        Ok(())
    }
}
