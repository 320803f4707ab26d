// Authenticate hook.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dine_core::{DineBeforeHook, HookContext};

use crate::identity::{extract_bearer_token, AuthError, Identity};
use crate::jwt::IdentityResolver;

pub trait AuthenticateHookParams: Clone + Send + Sync {
    fn provider(&self) -> Option<&str>;
    fn headers(&self) -> &HashMap<String, String>;
    fn authenticated(&self) -> bool;

    fn set_identity(&mut self, identity: Identity);
}

/// Transport params plus the caller's identity once authenticated.
///
/// `provider == None` marks an in-process call, which acts with the
/// service role and skips authentication.
#[derive(Clone, Debug, Default)]
pub struct AuthParams<P> {
    pub inner: P,
    pub provider: Option<String>,
    pub headers: HashMap<String, String>,
    pub identity: Option<Identity>,
    pub authenticated: bool,
}

impl<P> AuthParams<P> {
    pub fn internal(inner: P) -> Self {
        Self {
            inner,
            provider: None,
            headers: HashMap::new(),
            identity: None,
            authenticated: false,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.provider
            .as_deref()
            .map(|p| p.trim().is_empty())
            .unwrap_or(true)
    }
}

impl<P> AuthenticateHookParams for AuthParams<P>
where
    P: Clone + Send + Sync,
{
    fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn authenticated(&self) -> bool {
        self.authenticated
    }

    fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
        self.authenticated = true;
    }
}

/// Rejects external calls without a valid bearer credential.
pub struct AuthenticateHook {
    resolver: Arc<dyn IdentityResolver>,
}

impl AuthenticateHook {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<R, P> DineBeforeHook<R, P> for AuthenticateHook
where
    R: Send + 'static,
    P: AuthenticateHookParams + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()> {
        if ctx.params.authenticated() {
            return Ok(());
        }

        let provider = ctx.params.provider().unwrap_or("");
        if provider.trim().is_empty() {
            // Internal call: allow through.
            return Ok(());
        }

        let token = extract_bearer_token(ctx.params.headers())
            .ok_or_else(|| AuthError::NotAuthenticated.into_dine().into_anyhow())?;

        let identity = self
            .resolver
            .resolve(&token)
            .await
            .map_err(|e| e.into_dine().into_anyhow())?;

        tracing::debug!(
            user = %identity.user_id,
            service = %ctx.service_name,
            method = ctx.method.as_str(),
            "authenticated"
        );
        ctx.params.set_identity(identity);

        Ok(())
    }
}
