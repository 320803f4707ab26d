use std::collections::HashMap;

use dine_auth::AuthParams;
use dine_axum::params::RestParams;
use dine_core::DineApp;
use serde_json::Value;
use tokio::sync::RwLock;

pub type DineParams = AuthParams<RestParams>;

pub type App = DineApp<Value, DineParams>;

/// Params for an in-process call: acts with the service role.
pub fn internal_params() -> DineParams {
    AuthParams::internal(RestParams::default())
}

/// Query filter builders for in-process calls.
pub trait ParamsExt: Sized {
    fn eq(self, field: &str, value: impl Into<String>) -> Self;
    fn is_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;
    fn query(&self) -> &HashMap<String, String>;
}

impl ParamsExt for DineParams {
    fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.inner.query.insert(field.to_string(), value.into());
        self
    }

    fn is_in<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.inner
            .query
            .insert(field.to_string(), format!("in.({list})"));
        self
    }

    fn query(&self) -> &HashMap<String, String> {
        &self.inner.query
    }
}

/// The backing store: one row list per table.
#[derive(Default)]
pub struct DineState {
    pub tenants: RwLock<Vec<Value>>,
    pub menu_items: RwLock<Vec<Value>>,
    pub orders: RwLock<Vec<Value>>,
    pub user_roles: RwLock<Vec<Value>>,
    pub subscriptions: RwLock<Vec<Value>>,
    pub users: RwLock<Vec<Value>>,
    pub staff: RwLock<Vec<Value>>,
}
