use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use dine_core::errors::DineError;
use dine_core::tenant::TenantContext;
use dine_core::ServiceCapabilities;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::{DineParams, DineState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Tenants,
    MenuItems,
    Orders,
    UserRoles,
    Subscriptions,
    Users,
    Staff,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Tenants => "tenants",
            Table::MenuItems => "menu_items",
            Table::Orders => "orders",
            Table::UserRoles => "user_roles",
            Table::Subscriptions => "subscriptions",
            Table::Users => "users",
            Table::Staff => "staff",
        }
    }

    /// Rows carry a `tenant_id` and are only visible inside that tenant.
    pub fn tenant_scoped(self) -> bool {
        matches!(self, Table::MenuItems | Table::Orders | Table::Staff)
    }
}

/// Generic row storage for one table.
///
/// Query params filter rows for every method, by-id calls included:
/// `field=value` compares the field rendered as text, `field=in.(a,b)`
/// tests membership. Keys starting with `$` are reserved and ignored here.
pub struct TableAdapter {
    pub state: Arc<DineState>,
    pub table: Table,
    pub unique: &'static [&'static str],
    pub capabilities: ServiceCapabilities,
}

fn as_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn parse_in_list(filter: &str) -> Option<Vec<String>> {
    let inner = filter.strip_prefix("in.(")?.strip_suffix(')')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    Some(
        inner
            .split(',')
            .map(|s| s.trim().trim_matches('"').to_string())
            .collect(),
    )
}

/// Whether `row` satisfies every filter in `query`.
pub fn matches(row: &Value, query: &HashMap<String, String>) -> bool {
    query
        .iter()
        .filter(|(k, _)| !k.starts_with('$'))
        .all(|(field, filter)| {
            let actual = as_text(row.get(field));
            match parse_in_list(filter) {
                Some(list) => list.iter().any(|v| *v == actual),
                None => actual == *filter,
            }
        })
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(|v| v.as_str())
}

impl TableAdapter {
    pub fn new(
        state: Arc<DineState>,
        table: Table,
        unique: &'static [&'static str],
        capabilities: ServiceCapabilities,
    ) -> Self {
        Self {
            state,
            table,
            unique,
            capabilities,
        }
    }

    fn rows(&self) -> &RwLock<Vec<Value>> {
        match self.table {
            Table::Tenants => &self.state.tenants,
            Table::MenuItems => &self.state.menu_items,
            Table::Orders => &self.state.orders,
            Table::UserRoles => &self.state.user_roles,
            Table::Subscriptions => &self.state.subscriptions,
            Table::Users => &self.state.users,
            Table::Staff => &self.state.staff,
        }
    }

    /// Tenant the caller is confined to, if any.
    fn scope<'a>(&self, ctx: &'a TenantContext) -> Option<&'a str> {
        (self.table.tenant_scoped() && !ctx.is_global()).then(|| ctx.as_str())
    }

    fn visible(&self, ctx: &TenantContext, row: &Value) -> bool {
        match self.scope(ctx) {
            Some(tenant) => row.get("tenant_id").and_then(|v| v.as_str()) == Some(tenant),
            None => true,
        }
    }

    fn selects(&self, ctx: &TenantContext, params: &DineParams, row: &Value) -> bool {
        self.visible(ctx, row) && matches(row, &params.inner.query)
    }

    fn position(&self, rows: &[Value], ctx: &TenantContext, params: &DineParams, id: &str) -> Result<usize> {
        rows.iter()
            .position(|r| row_id(r) == Some(id) && self.selects(ctx, params, r))
            .ok_or_else(|| self.not_found(id))
    }

    fn not_found(&self, id: &str) -> anyhow::Error {
        DineError::not_found(format!("No record found in {} for id '{id}'", self.table.name()))
            .into_anyhow()
    }

    fn object(&self, data: Value) -> Result<Map<String, Value>> {
        match data {
            Value::Object(obj) => Ok(obj),
            _ => Err(DineError::bad_request(format!(
                "{} expects a JSON object",
                self.table.name()
            ))
            .into_anyhow()),
        }
    }

    fn check_unique(&self, rows: &[Value], candidate: &Map<String, Value>, own_id: &str) -> Result<()> {
        for field in self.unique {
            let Some(value) = candidate.get(*field).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = rows
                .iter()
                .any(|r| row_id(r) != Some(own_id) && r.get(*field) == Some(value));
            if taken {
                return Err(DineError::conflict(format!(
                    "{}.{} already exists: {}",
                    self.table.name(),
                    field,
                    as_text(Some(value))
                ))
                .into_anyhow());
            }
        }
        Ok(())
    }

    fn merge(existing: &Value, patch: &Map<String, Value>, keep: &[&str]) -> Value {
        let mut record = existing.as_object().cloned().unwrap_or_default();
        for (k, v) in patch {
            if keep.contains(&k.as_str()) {
                continue;
            }
            record.insert(k.clone(), v.clone());
        }
        Value::Object(record)
    }

    pub async fn _create(&self, ctx: &TenantContext, data: Value, _params: DineParams) -> Result<Value> {
        let mut obj = self.object(data)?;

        let id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        obj.insert("id".to_string(), Value::String(id.clone()));

        if self.table.tenant_scoped() {
            match self.scope(ctx) {
                Some(tenant) => {
                    obj.insert("tenant_id".to_string(), Value::String(tenant.to_string()));
                }
                None => {
                    let has_tenant = obj
                        .get("tenant_id")
                        .and_then(|v| v.as_str())
                        .is_some_and(|s| !s.trim().is_empty());
                    if !has_tenant {
                        return Err(DineError::bad_request(format!(
                            "{} rows require a tenant_id",
                            self.table.name()
                        ))
                        .into_anyhow());
                    }
                }
            }
        }

        let mut rows = self.rows().write().await;
        if rows.iter().any(|r| row_id(r) == Some(id.as_str())) {
            return Err(DineError::conflict(format!(
                "{}.id already exists: {id}",
                self.table.name()
            ))
            .into_anyhow());
        }
        self.check_unique(&rows, &obj, &id)?;

        let value = Value::Object(obj);
        rows.push(value.clone());
        Ok(value)
    }

    pub async fn _find(&self, ctx: &TenantContext, params: DineParams) -> Result<Vec<Value>> {
        let rows = self.rows().read().await;
        Ok(rows
            .iter()
            .filter(|r| self.selects(ctx, &params, r))
            .cloned()
            .collect())
    }

    pub async fn _get(&self, ctx: &TenantContext, id: &str, params: DineParams) -> Result<Value> {
        let rows = self.rows().read().await;
        let pos = self.position(&rows, ctx, &params, id)?;
        Ok(rows[pos].clone())
    }

    pub async fn _update(&self, ctx: &TenantContext, id: &str, data: Value, params: DineParams) -> Result<Value> {
        let mut obj = self.object(data)?;

        let mut rows = self.rows().write().await;
        let pos = self.position(&rows, ctx, &params, id)?;

        obj.insert("id".to_string(), Value::String(id.to_string()));
        if self.table.tenant_scoped() {
            if let Some(tenant) = rows[pos].get("tenant_id").cloned() {
                obj.insert("tenant_id".to_string(), tenant);
            }
        }
        self.check_unique(&rows, &obj, id)?;

        let value = Value::Object(obj);
        rows[pos] = value.clone();
        Ok(value)
    }

    /// `Some(id)` patches one row; `None` patches every row matching the
    /// query and returns them as an array.
    pub async fn _patch(
        &self,
        ctx: &TenantContext,
        id: Option<&str>,
        data: Value,
        params: DineParams,
    ) -> Result<Value> {
        let patch = self.object(data)?;
        let keep: &[&str] = if self.table.tenant_scoped() {
            &["id", "tenant_id"]
        } else {
            &["id"]
        };

        let mut rows = self.rows().write().await;

        let targets: Vec<usize> = match id {
            Some(id) => vec![self.position(&rows, ctx, &params, id)?],
            None => rows
                .iter()
                .enumerate()
                .filter(|(_, r)| self.selects(ctx, &params, r))
                .map(|(i, _)| i)
                .collect(),
        };

        let mut updated = Vec::with_capacity(targets.len());
        for pos in targets {
            let next = Self::merge(&rows[pos], &patch, keep);
            let own_id = row_id(&next).unwrap_or_default().to_string();
            if let Some(obj) = next.as_object() {
                self.check_unique(&rows, obj, &own_id)?;
            }
            rows[pos] = next.clone();
            updated.push(next);
        }

        match id {
            Some(_) => Ok(updated.pop().unwrap_or(Value::Null)),
            None => Ok(Value::Array(updated)),
        }
    }

    /// `Some(id)` removes one row; `None` removes every row matching the
    /// query and returns them as an array.
    pub async fn _remove(&self, ctx: &TenantContext, id: Option<&str>, params: DineParams) -> Result<Value> {
        let mut rows = self.rows().write().await;

        match id {
            Some(id) => {
                let pos = self.position(&rows, ctx, &params, id)?;
                Ok(rows.remove(pos))
            }
            None => {
                let (removed, kept): (Vec<Value>, Vec<Value>) = rows
                    .drain(..)
                    .partition(|r| self.selects(ctx, &params, r));
                *rows = kept;
                Ok(Value::Array(removed))
            }
        }
    }
}

dine_core::dine_adapter!(TableAdapter, serde_json::Value, crate::services::DineParams);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn filters_compare_text_and_membership() {
        let row = json!({"id": "a", "slug": "demo-burger", "is_available": true, "tenant_id": null});

        assert!(matches(&row, &q(&[("slug", "demo-burger")])));
        assert!(matches(&row, &q(&[("is_available", "true")])));
        assert!(matches(&row, &q(&[("tenant_id", "null")])));
        assert!(matches(&row, &q(&[("id", "in.(x,a)")])));
        assert!(matches(&row, &q(&[("$limit", "1")])));
        assert!(!matches(&row, &q(&[("id", "in.()")])));
        assert!(!matches(&row, &q(&[("slug", "pizza")])));
        assert!(!matches(&row, &q(&[("missing", "x")])));
    }
}
