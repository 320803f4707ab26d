use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::RwLock;

use crate::errors::DineError;
use crate::hooks::collect_method_hooks;
use crate::{
    DineAfterHook, DineAroundHook, DineBeforeHook, DineConfig, DineConfigSnapshot, DineErrorHook,
    DineService, DineServiceRegistry, HookContext, HookResult, Next, ServiceCapabilities,
    ServiceHooks, ServiceMethodKind, TenantContext,
};

struct DineAppInner<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    registry: RwLock<DineServiceRegistry<R, P>>,
    global_hooks: RwLock<ServiceHooks<R, P>>,
    service_hooks: RwLock<HashMap<String, ServiceHooks<R, P>>>,
    config: RwLock<DineConfig>,
}

/// The central application container.
///
/// Framework-agnostic. Holds:
/// - service registry
/// - app hooks
/// - per-service hooks
/// - config
///
/// Cloning is cheap; clones share the same container.
pub struct DineApp<R, P = ()>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    inner: Arc<DineAppInner<R, P>>,
}

type HooksForMethod<R, P> = (
    Vec<Arc<dyn DineAroundHook<R, P>>>,
    Vec<Arc<dyn DineBeforeHook<R, P>>>,
    Vec<Arc<dyn DineAfterHook<R, P>>>,
    Vec<Arc<dyn DineErrorHook<R, P>>>,
);

impl<R, P> Default for DineApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> Clone for DineApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, P> DineApp<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DineAppInner {
                registry: RwLock::new(DineServiceRegistry::new()),
                global_hooks: RwLock::new(ServiceHooks::new()),
                service_hooks: RwLock::new(HashMap::new()),
                config: RwLock::new(DineConfig::new()),
            }),
        }
    }

    pub fn register_service<S>(&self, name: S, service: Arc<dyn DineService<R, P>>)
    where
        S: Into<String>,
    {
        self.inner.registry.write().register(name, service);
    }

    /// App-wide hooks, run before the service's own.
    pub fn hooks<F>(&self, f: F)
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        let mut g = self.inner.global_hooks.write();
        f(&mut g);
    }

    pub(crate) fn configure_service_hooks<F>(&self, service_name: &str, f: F)
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        let mut map = self.inner.service_hooks.write();
        let hooks = map.entry(service_name.to_string()).or_default();
        f(hooks);
    }

    /// Look up a registered service, wrapped in the hook pipeline.
    pub fn service(&self, name: &str) -> Result<ServiceHandle<R, P>> {
        let svc = self
            .inner
            .registry
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DineError::not_found(format!("Service not found: {name}")).into_anyhow())?;

        Ok(ServiceHandle {
            app: self.clone(),
            name: name.to_string(),
            service: svc,
        })
    }

    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.config.write().set(key, value);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.config.read().get(key).map(|v| v.to_string())
    }

    /// Overlay environment variables starting with `prefix`.
    pub fn load_env(&self, prefix: &str) -> usize {
        self.inner.config.write().load_env(prefix)
    }

    pub fn config_snapshot(&self) -> DineConfigSnapshot {
        self.inner.config.read().snapshot()
    }
}

/// A named service bound to its app, so calls go through the hooks.
pub struct ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    app: DineApp<R, P>,
    name: String,
    service: Arc<dyn DineService<R, P>>,
}

impl<R, P> ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn hooks<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceHooks<R, P>),
    {
        self.app.configure_service_hooks(&self.name, f);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> ServiceCapabilities {
        self.service.capabilities()
    }

    pub fn inner(&self) -> &Arc<dyn DineService<R, P>> {
        &self.service
    }
}

/// Which service method a pipeline run ends in.
enum Call {
    Find,
    Get(String),
    Create,
    Update(String),
    Patch(Option<String>),
    Remove(Option<String>),
}

impl Call {
    fn method(&self) -> ServiceMethodKind {
        match self {
            Call::Find => ServiceMethodKind::Find,
            Call::Get(_) => ServiceMethodKind::Get,
            Call::Create => ServiceMethodKind::Create,
            Call::Update(_) => ServiceMethodKind::Update,
            Call::Patch(_) => ServiceMethodKind::Patch,
            Call::Remove(_) => ServiceMethodKind::Remove,
        }
    }
}

fn take_data<R, P>(ctx: &mut HookContext<R, P>) -> Result<R>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    ctx.data
        .take()
        .ok_or_else(|| anyhow!("{}() requires ctx.data", ctx.method.as_str()))
}

async fn dispatch<R, P>(
    svc: &Arc<dyn DineService<R, P>>,
    call: &Call,
    ctx: &mut HookContext<R, P>,
) -> Result<()>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    let result = match call {
        Call::Find => HookResult::Many(svc.find(&ctx.tenant, ctx.params.clone()).await?),
        Call::Get(id) => HookResult::One(svc.get(&ctx.tenant, id, ctx.params.clone()).await?),
        Call::Create => {
            let data = take_data(ctx)?;
            HookResult::One(svc.create(&ctx.tenant, data, ctx.params.clone()).await?)
        }
        Call::Update(id) => {
            let data = take_data(ctx)?;
            HookResult::One(svc.update(&ctx.tenant, id, data, ctx.params.clone()).await?)
        }
        Call::Patch(id) => {
            let data = take_data(ctx)?;
            HookResult::One(
                svc.patch(&ctx.tenant, id.as_deref(), data, ctx.params.clone())
                    .await?,
            )
        }
        Call::Remove(id) => HookResult::One(
            svc.remove(&ctx.tenant, id.as_deref(), ctx.params.clone())
                .await?,
        ),
    };
    ctx.result = Some(result);
    Ok(())
}

// ──────────────────────────────────────────────────────────────
// Pipeline
// ──────────────────────────────────────────────────────────────

impl<R, P> ServiceHandle<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    /// Global hooks first, then service hooks.
    fn collect_hooks_for_method(&self, method: ServiceMethodKind) -> HooksForMethod<R, P> {
        let g = self.app.inner.global_hooks.read();
        let map = self.app.inner.service_hooks.read();

        let mut around = collect_method_hooks(&g.around_all, &g.around_by_method, method);
        let mut before = collect_method_hooks(&g.before_all, &g.before_by_method, method);
        let mut after = collect_method_hooks(&g.after_all, &g.after_by_method, method);
        let mut error = collect_method_hooks(&g.error_all, &g.error_by_method, method);

        if let Some(h) = map.get(&self.name) {
            around.extend(collect_method_hooks(&h.around_all, &h.around_by_method, method));
            before.extend(collect_method_hooks(&h.before_all, &h.before_by_method, method));
            after.extend(collect_method_hooks(&h.after_all, &h.after_by_method, method));
            error.extend(collect_method_hooks(&h.error_all, &h.error_by_method, method));
        }

        (around, before, after, error)
    }

    fn context(&self, tenant: TenantContext, method: ServiceMethodKind, params: P) -> HookContext<R, P> {
        HookContext::new(
            tenant,
            self.name.clone(),
            method,
            params,
            ServiceCaller::new(self.app.clone()),
            self.app.config_snapshot(),
        )
    }

    /// around → before → service → after, then error hooks on failure.
    async fn run_pipeline(&self, call: Call, mut ctx: HookContext<R, P>) -> Result<HookContext<R, P>> {
        let (around, before, after, error) = self.collect_hooks_for_method(call.method());
        let svc = Arc::clone(&self.service);

        let mut next: Next<R, P> = Next::new(move |ctx| {
            Box::pin(async move {
                for h in &before {
                    h.run(ctx).await?;
                }

                if ctx.result.is_none() {
                    dispatch(&svc, &call, ctx).await?;
                }

                for h in &after {
                    h.run(ctx).await?;
                }

                Ok(())
            })
        });

        // First registered around hook is the outermost.
        for hook in around.into_iter().rev() {
            let prev = next;
            next = Next::new(move |ctx| {
                Box::pin(async move { hook.run(ctx, prev).await })
            });
        }

        if let Err(e) = next.run(&mut ctx).await {
            ctx.error = Some(e);

            for h in &error {
                if let Err(replaced) = h.run(&mut ctx).await {
                    ctx.error = Some(replaced);
                }
            }

            if let Some(err) = ctx.error.take() {
                return Err(err);
            }
        }

        Ok(ctx)
    }

    fn one(ctx: HookContext<R, P>) -> Result<R> {
        let method = ctx.method.as_str();
        match ctx.result {
            Some(HookResult::One(v)) => Ok(v),
            Some(HookResult::Many(_)) => Err(anyhow!("{method}() produced HookResult::Many unexpectedly")),
            None => Err(anyhow!("{method}() produced no result")),
        }
    }

    pub async fn find(&self, tenant: TenantContext, params: P) -> Result<Vec<R>> {
        let ctx = self.context(tenant, ServiceMethodKind::Find, params);
        let ctx = self.run_pipeline(Call::Find, ctx).await?;

        match ctx.result {
            Some(HookResult::Many(v)) => Ok(v),
            Some(HookResult::One(_)) => Err(anyhow!("find() produced HookResult::One unexpectedly")),
            None => Ok(vec![]),
        }
    }

    pub async fn get(&self, tenant: TenantContext, id: &str, params: P) -> Result<R> {
        let mut ctx = self.context(tenant, ServiceMethodKind::Get, params);
        ctx.id = Some(id.to_string());
        let ctx = self.run_pipeline(Call::Get(id.to_string()), ctx).await?;
        Self::one(ctx)
    }

    pub async fn create(&self, tenant: TenantContext, data: R, params: P) -> Result<R> {
        let mut ctx = self.context(tenant, ServiceMethodKind::Create, params);
        ctx.data = Some(data);
        let ctx = self.run_pipeline(Call::Create, ctx).await?;
        Self::one(ctx)
    }

    pub async fn update(&self, tenant: TenantContext, id: &str, data: R, params: P) -> Result<R> {
        let mut ctx = self.context(tenant, ServiceMethodKind::Update, params);
        ctx.id = Some(id.to_string());
        ctx.data = Some(data);
        let ctx = self.run_pipeline(Call::Update(id.to_string()), ctx).await?;
        Self::one(ctx)
    }

    pub async fn patch(&self, tenant: TenantContext, id: Option<&str>, data: R, params: P) -> Result<R> {
        let mut ctx = self.context(tenant, ServiceMethodKind::Patch, params);
        ctx.id = id.map(|s| s.to_string());
        ctx.data = Some(data);
        let ctx = self
            .run_pipeline(Call::Patch(id.map(|s| s.to_string())), ctx)
            .await?;
        Self::one(ctx)
    }

    pub async fn remove(&self, tenant: TenantContext, id: Option<&str>, params: P) -> Result<R> {
        let mut ctx = self.context(tenant, ServiceMethodKind::Remove, params);
        ctx.id = id.map(|s| s.to_string());
        let ctx = self
            .run_pipeline(Call::Remove(id.map(|s| s.to_string())), ctx)
            .await?;
        Self::one(ctx)
    }
}

/// Handed to hooks so they can call sibling services.
pub struct ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    app: DineApp<R, P>,
}

impl<R, P> Clone for ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
        }
    }
}

impl<R, P> ServiceCaller<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(app: DineApp<R, P>) -> Self {
        Self { app }
    }

    pub fn service(&self, name: &str) -> Result<ServiceHandle<R, P>> {
        self.app.service(name)
    }
}
