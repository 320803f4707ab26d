//! Who may touch which tenant's rows.
//!
//! In-process calls act with the service role. External callers must be
//! super admins, the tenant's owner, or hold a role scoped to it.

use anyhow::Result;
use async_trait::async_trait;
use dine_auth::{Identity, RoleLookup};
use dine_core::errors::DineError;
use dine_core::{DineBeforeHook, HookContext, ServiceHandle, ServiceMethodKind, TenantContext};
use serde_json::Value;

use crate::models::Role;
use crate::services::{internal_params, App, DineParams, ParamsExt};

pub enum Caller {
    Service,
    SuperAdmin(Identity),
    User(Identity),
}

type Handle = ServiceHandle<Value, DineParams>;

pub async fn has_role(user_roles: &Handle, user_id: &str, role: Role) -> Result<bool> {
    let rows = user_roles
        .find(
            TenantContext::global(),
            internal_params().eq("user_id", user_id).eq("role", role.as_str()),
        )
        .await?;
    Ok(!rows.is_empty())
}

/// Owner of the tenant, or holder of a role scoped to it.
pub async fn can_manage_tenant(
    tenants: &Handle,
    user_roles: &Handle,
    user_id: &str,
    tenant_id: &str,
) -> Result<bool> {
    let owned = tenants
        .find(
            TenantContext::global(),
            internal_params().eq("id", tenant_id).eq("owner_id", user_id),
        )
        .await?;
    if !owned.is_empty() {
        return Ok(true);
    }

    let scoped = user_roles
        .find(
            TenantContext::global(),
            internal_params().eq("user_id", user_id).eq("tenant_id", tenant_id),
        )
        .await?;
    Ok(!scoped.is_empty())
}

pub async fn caller(ctx: &HookContext<Value, DineParams>) -> Result<Caller> {
    if ctx.params.is_internal() {
        return Ok(Caller::Service);
    }

    let identity = ctx
        .params
        .identity
        .clone()
        .ok_or_else(|| DineError::not_authenticated("Not authenticated").into_anyhow())?;

    let user_roles = ctx.services.service("user_roles")?;
    if has_role(&user_roles, &identity.user_id, Role::SuperAdmin).await? {
        Ok(Caller::SuperAdmin(identity))
    } else {
        Ok(Caller::User(identity))
    }
}

fn forbidden() -> anyhow::Error {
    DineError::forbidden("You do not have access to this restaurant").into_anyhow()
}

/// Guards tenant-scoped tables against callers outside the tenant.
pub struct RequireTenantAccess;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for RequireTenantAccess {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let identity = match caller(ctx).await? {
            Caller::Service | Caller::SuperAdmin(_) => return Ok(()),
            Caller::User(identity) => identity,
        };

        if ctx.tenant.is_global() {
            return Err(forbidden());
        }

        let tenants = ctx.services.service("tenants")?;
        let user_roles = ctx.services.service("user_roles")?;
        if can_manage_tenant(&tenants, &user_roles, &identity.user_id, ctx.tenant.as_str()).await? {
            Ok(())
        } else {
            Err(forbidden())
        }
    }
}

/// Confines non-admin callers of `tenants` to the tenants they own.
pub struct ScopeTenantsToOwner;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for ScopeTenantsToOwner {
    async fn run(&self, ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        let identity = match caller(ctx).await? {
            Caller::Service | Caller::SuperAdmin(_) => return Ok(()),
            Caller::User(identity) => identity,
        };

        match ctx.method {
            ServiceMethodKind::Create => {
                if let Some(obj) = ctx.data.as_mut().and_then(|d| d.as_object_mut()) {
                    obj.insert("owner_id".to_string(), Value::String(identity.user_id));
                }
            }
            ServiceMethodKind::Update => {
                if let Some(obj) = ctx.data.as_mut().and_then(|d| d.as_object_mut()) {
                    obj.insert("owner_id".to_string(), Value::String(identity.user_id.clone()));
                }
                ctx.params.inner.query.insert("owner_id".to_string(), identity.user_id);
            }
            _ => {
                if let Some(obj) = ctx.data.as_mut().and_then(|d| d.as_object_mut()) {
                    obj.remove("owner_id");
                }
                ctx.params.inner.query.insert("owner_id".to_string(), identity.user_id);
            }
        }
        Ok(())
    }
}

/// Role checks against the `user_roles` service, for the function gate.
pub struct ServiceRoleLookup {
    pub app: App,
}

#[async_trait]
impl RoleLookup for ServiceRoleLookup {
    async fn has_role(&self, user_id: &str, role: &str) -> Result<bool> {
        let Some(role) = Role::parse(role) else {
            return Ok(false);
        };
        let user_roles = self.app.service("user_roles")?;
        has_role(&user_roles, user_id, role).await
    }
}
