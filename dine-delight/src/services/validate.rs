//! Field checks shared by the per-table validation hooks.

use std::collections::BTreeMap;

use dine_core::errors::DineError;
use serde_json::{json, Map, Value};

use crate::money::Money;

/// Collects field errors, then fails once with all of them.
pub struct Violations {
    message: String,
    fields: BTreeMap<String, Vec<String>>,
}

impl Violations {
    pub fn new(service: &str) -> Self {
        Self {
            message: format!("{service} validation failed"),
            fields: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, field: &str, msg: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }

    pub fn into_result(self) -> anyhow::Result<()> {
        if self.fields.is_empty() {
            return Ok(());
        }
        Err(DineError::unprocessable(self.message)
            .with_errors(json!(self.fields))
            .into_anyhow())
    }
}

pub fn object_mut<'a>(data: Option<&'a mut Value>, service: &str) -> anyhow::Result<&'a mut Map<String, Value>> {
    data.and_then(|d| d.as_object_mut()).ok_or_else(|| {
        DineError::bad_request(format!("{service} expects a JSON object")).into_anyhow()
    })
}

/// Trimmed non-empty string, recording a violation otherwise.
pub fn required_str(obj: &mut Map<String, Value>, field: &str, v: &mut Violations) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => {
            let trimmed = s.trim().to_string();
            obj.insert(field.to_string(), Value::String(trimmed.clone()));
            Some(trimmed)
        }
        Some(Value::String(_)) | None | Some(Value::Null) => {
            v.add(field, "is required");
            None
        }
        Some(_) => {
            v.add(field, "must be a string");
            None
        }
    }
}

/// Same as [`required_str`], but only when the field is present.
pub fn present_str(obj: &mut Map<String, Value>, field: &str, v: &mut Violations) -> Option<String> {
    if obj.contains_key(field) {
        required_str(obj, field, v)
    } else {
        None
    }
}

/// Trimmed string or null; blank strings become null.
pub fn optional_str(obj: &mut Map<String, Value>, field: &str, v: &mut Violations) {
    let normalized = match obj.get(field) {
        None => return,
        Some(Value::Null) => Value::Null,
        Some(Value::String(s)) if s.trim().is_empty() => Value::Null,
        Some(Value::String(s)) => Value::String(s.trim().to_string()),
        Some(_) => {
            v.add(field, "must be a string");
            return;
        }
    };
    obj.insert(field.to_string(), normalized);
}

/// Non-negative amount, normalised to two decimals.
pub fn amount(obj: &mut Map<String, Value>, field: &str, required: bool, v: &mut Violations) -> Option<Money> {
    let Some(raw) = obj.get(field) else {
        if required {
            v.add(field, "is required");
        }
        return None;
    };
    match Money::from_json(raw) {
        Some(m) if !m.is_negative() => {
            obj.insert(field.to_string(), m.to_json());
            Some(m)
        }
        Some(_) => {
            v.add(field, "must not be negative");
            None
        }
        None => {
            v.add(field, "must be a number");
            None
        }
    }
}

pub fn bool_or(obj: &mut Map<String, Value>, field: &str, default: bool, v: &mut Violations) {
    match obj.get(field) {
        None | Some(Value::Null) => {
            obj.insert(field.to_string(), Value::Bool(default));
        }
        Some(Value::Bool(_)) => {}
        Some(_) => v.add(field, "must be a boolean"),
    }
}

/// String field restricted to `allowed`, defaulting when absent.
pub fn one_of(
    obj: &mut Map<String, Value>,
    field: &str,
    allowed: &[&str],
    default: Option<&str>,
    v: &mut Violations,
) {
    match obj.get(field) {
        None | Some(Value::Null) => match default {
            Some(d) => {
                obj.insert(field.to_string(), Value::String(d.to_string()));
            }
            None => v.add(field, "is required"),
        },
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
        Some(_) => v.add(field, format!("must be one of: {}", allowed.join(", "))),
    }
}
