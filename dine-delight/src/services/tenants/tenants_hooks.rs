use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dine_axum::host::is_reserved_label;
use dine_core::hooks::{DineBeforeHook, HookContext};
use serde_json::{Map, Value};

use crate::services::validate::{object_mut, optional_str, present_str, required_str, Violations};
use crate::services::DineParams;

const SERVICE: &str = "Tenants";

/// Lowercase letters, digits and inner dashes; never a reserved label.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !is_reserved_label(slug)
}

fn check_slug(obj: &Map<String, Value>, v: &mut Violations) {
    if let Some(slug) = obj.get("slug").and_then(|s| s.as_str()) {
        if !is_valid_slug(slug) {
            v.add(
                "slug",
                "must be lowercase letters, digits or '-', and not a reserved name",
            );
        }
    }
}

fn branding(obj: &mut Map<String, Value>, v: &mut Violations) {
    for field in ["logo_url", "brand_color", "tagline"] {
        optional_str(obj, field, v);
    }
}

pub struct ValidateTenant;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateTenant {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        required_str(obj, "name", &mut v);
        required_str(obj, "slug", &mut v);
        required_str(obj, "owner_id", &mut v);
        check_slug(obj, &mut v);
        branding(obj, &mut v);

        if !obj.get("created_at").is_some_and(|c| c.is_string()) {
            obj.insert("created_at".to_string(), Value::String(Utc::now().to_rfc3339()));
        }

        v.into_result()
    }
}

pub struct ValidateTenantPatch;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ValidateTenantPatch {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let obj = object_mut(ctx.data.as_mut(), SERVICE)?;
        let mut v = Violations::new(SERVICE);

        present_str(obj, "name", &mut v);
        present_str(obj, "slug", &mut v);
        present_str(obj, "owner_id", &mut v);
        check_slug(obj, &mut v);
        branding(obj, &mut v);
        obj.remove("created_at");

        v.into_result()
    }
}
