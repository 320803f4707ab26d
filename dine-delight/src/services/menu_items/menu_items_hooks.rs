use anyhow::Result;
use async_trait::async_trait;
use dine_core::hooks::{DineBeforeHook, HookContext};
use serde_json::{Map, Value};

use crate::services::validate::{
    amount, bool_or, object_mut, optional_str, present_str, required_str, Violations,
};
use crate::services::DineParams;

const SERVICE: &str = "Menu items";

fn details(obj: &mut Map<String, Value>, v: &mut Violations) {
    for field in ["description", "category", "image_url"] {
        optional_str(obj, field, v);
    }
}

pub struct ValidateMenuItem;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateMenuItem {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        required_str(obj, "name", &mut v);
        amount(obj, "price", true, &mut v);
        bool_or(obj, "is_available", true, &mut v);
        details(obj, &mut v);

        v.into_result()
    }
}

pub struct ValidateMenuItemPatch;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateMenuItemPatch {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        present_str(obj, "name", &mut v);
        amount(obj, "price", false, &mut v);
        if obj.contains_key("is_available") && !obj["is_available"].is_boolean() {
            v.add("is_available", "must be a boolean");
        }
        details(obj, &mut v);

        v.into_result()
    }
}
