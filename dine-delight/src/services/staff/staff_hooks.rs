use anyhow::Result;
use async_trait::async_trait;
use dine_core::hooks::{DineBeforeHook, HookContext};
use serde_json::Value;

use crate::services::validate::{object_mut, one_of, present_str, required_str, Violations};
use crate::services::DineParams;

const SERVICE: &str = "Staff";

pub const STAFF_ROLES: [&str; 2] = ["manager", "staff"];
pub const STAFF_STATUSES: [&str; 2] = ["active", "invited"];

/// New members start out `invited` with the `staff` role.
pub struct ValidateStaffMember {
    partial: bool,
}

impl ValidateStaffMember {
    pub fn full() -> Self {
        Self { partial: false }
    }

    pub fn partial() -> Self {
        Self { partial: true }
    }
}

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateStaffMember {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        let email = if self.partial {
            present_str(obj, "name", &mut v);
            present_str(obj, "email", &mut v)
        } else {
            required_str(obj, "name", &mut v);
            required_str(obj, "email", &mut v)
        };
        if email.is_some_and(|e| !e.contains('@')) {
            v.add("email", "must be an email address");
        }

        if !self.partial || obj.contains_key("role") {
            let default = (!self.partial).then_some("staff");
            one_of(obj, "role", &STAFF_ROLES, default, &mut v);
        }
        if !self.partial || obj.contains_key("status") {
            let default = (!self.partial).then_some("invited");
            one_of(obj, "status", &STAFF_STATUSES, default, &mut v);
        }

        v.into_result()
    }
}
