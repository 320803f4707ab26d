use anyhow::Result;
use async_trait::async_trait;
use dine_core::hooks::{DineBeforeHook, HookContext};
use serde_json::Value;

use crate::models::Role;
use crate::services::validate::{object_mut, one_of, optional_str, required_str, Violations};
use crate::services::DineParams;

const ROLES: [&str; 3] = [
    Role::SuperAdmin.as_str(),
    Role::Owner.as_str(),
    Role::Staff.as_str(),
];

/// `tenant_id: null` is a global role.
pub struct ValidateUserRole;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateUserRole {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), "User roles")?;
        let mut v = Violations::new("User roles");

        required_str(obj, "user_id", &mut v);
        one_of(obj, "role", &ROLES, None, &mut v);
        optional_str(obj, "tenant_id", &mut v);
        obj.entry("tenant_id").or_insert(Value::Null);

        v.into_result()
    }
}

pub struct ValidateSubscription;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateSubscription {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), "Subscriptions")?;
        let mut v = Violations::new("Subscriptions");

        required_str(obj, "tenant_id", &mut v);
        required_str(obj, "plan", &mut v);
        required_str(obj, "status", &mut v);

        v.into_result()
    }
}

pub struct ValidateUser;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateUser {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), "Users")?;
        let mut v = Violations::new("Users");

        required_str(obj, "email", &mut v);

        v.into_result()
    }
}
