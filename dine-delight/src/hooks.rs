use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dine_auth::{AuthenticateHook, IdentityResolver};
use dine_core::hooks::{DineAroundHook, HookContext, Next};
use serde_json::Value;

use crate::services::{App, DineParams};

/// Logs every service call and its failures.
pub struct LogAround;

#[async_trait]
impl DineAroundHook<Value, DineParams> for LogAround {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>, next: Next<Value, DineParams>) -> Result<()> {
        let service = ctx.service_name.clone();
        let method = ctx.method.as_str();
        let tenant = ctx.tenant.as_str().to_string();
        let provider = ctx.params.provider.clone().unwrap_or_else(|| "internal".to_string());

        tracing::debug!(%service, method, %tenant, %provider, "call");

        let res = next.run(ctx).await;
        if let Err(err) = &res {
            tracing::warn!(%service, method, %tenant, %provider, error = %err, "call failed");
        }
        res
    }
}

pub fn global_hooks(app: &App, resolver: Arc<dyn IdentityResolver>) {
    app.hooks(|h| {
        h.around_all(Arc::new(LogAround));
        h.before_all(Arc::new(AuthenticateHook::new(resolver)));
    });
}
