use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::app::ServiceCaller;
use crate::config::DineConfigSnapshot;
use crate::service::ServiceMethodKind;
use crate::tenant::TenantContext;

/// Output slot of a service call.
#[derive(Debug, Clone, PartialEq)]
pub enum HookResult<R> {
    One(R),
    Many(Vec<R>),
}

/// Context passed to hooks.
///
/// R = record type
/// P = params type (headers, query filters, identity, ...)
pub struct HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub tenant: TenantContext,
    pub service_name: String,
    pub method: ServiceMethodKind,
    /// Target row for get/update, and for patch/remove when given.
    pub id: Option<String>,
    pub params: P,
    /// Input payload (create/update/patch).
    pub data: Option<R>,
    /// Output. A before hook that fills this skips the service call.
    pub result: Option<HookResult<R>>,
    /// Set while error hooks run.
    pub error: Option<anyhow::Error>,
    pub services: ServiceCaller<R, P>,
    pub config: DineConfigSnapshot,
}

impl<R, P> HookContext<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new(
        tenant: TenantContext,
        service_name: impl Into<String>,
        method: ServiceMethodKind,
        params: P,
        services: ServiceCaller<R, P>,
        config: DineConfigSnapshot,
    ) -> Self {
        Self {
            tenant,
            service_name: service_name.into(),
            method,
            id: None,
            params,
            data: None,
            result: None,
            error: None,
            services,
            config,
        }
    }
}

pub type HookFut<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

type NextFn<R, P> = Box<dyn for<'a> FnOnce(&'a mut HookContext<R, P>) -> HookFut<'a> + Send>;

/// The rest of the pipeline, handed to around hooks.
pub struct Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    call: NextFn<R, P>,
}

impl<R, P> Next<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: for<'a> FnOnce(&'a mut HookContext<R, P>) -> HookFut<'a> + Send + 'static,
    {
        Self { call: Box::new(f) }
    }

    pub async fn run(self, ctx: &mut HookContext<R, P>) -> Result<()> {
        (self.call)(ctx).await
    }
}

#[async_trait]
pub trait DineAroundHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>, next: Next<R, P>) -> Result<()>;
}

#[async_trait]
pub trait DineBeforeHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

#[async_trait]
pub trait DineAfterHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

/// Runs when any earlier stage failed. Clearing `ctx.error` recovers
/// the call; replacing it changes what the caller sees.
#[async_trait]
pub trait DineErrorHook<R, P>: Send + Sync
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    async fn run(&self, ctx: &mut HookContext<R, P>) -> Result<()>;
}

type HookMap<T> = HashMap<ServiceMethodKind, Vec<Arc<T>>>;

/// Hook registrations for the app (global) or a single service.
pub struct ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub(crate) around_all: Vec<Arc<dyn DineAroundHook<R, P>>>,
    pub(crate) around_by_method: HookMap<dyn DineAroundHook<R, P>>,
    pub(crate) before_all: Vec<Arc<dyn DineBeforeHook<R, P>>>,
    pub(crate) before_by_method: HookMap<dyn DineBeforeHook<R, P>>,
    pub(crate) after_all: Vec<Arc<dyn DineAfterHook<R, P>>>,
    pub(crate) after_by_method: HookMap<dyn DineAfterHook<R, P>>,
    pub(crate) error_all: Vec<Arc<dyn DineErrorHook<R, P>>>,
    pub(crate) error_by_method: HookMap<dyn DineErrorHook<R, P>>,
}

impl<R, P> Default for ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, P> ServiceHooks<R, P>
where
    R: Send + 'static,
    P: Send + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            around_all: Vec::new(),
            around_by_method: HashMap::new(),
            before_all: Vec::new(),
            before_by_method: HashMap::new(),
            after_all: Vec::new(),
            after_by_method: HashMap::new(),
            error_all: Vec::new(),
            error_by_method: HashMap::new(),
        }
    }

    pub fn around_all(&mut self, hook: Arc<dyn DineAroundHook<R, P>>) -> &mut Self {
        self.around_all.push(hook);
        self
    }

    pub fn around(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn DineAroundHook<R, P>>,
    ) -> &mut Self {
        self.around_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before_all(&mut self, hook: Arc<dyn DineBeforeHook<R, P>>) -> &mut Self {
        self.before_all.push(hook);
        self
    }

    pub fn before(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn DineBeforeHook<R, P>>,
    ) -> &mut Self {
        self.before_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn after_all(&mut self, hook: Arc<dyn DineAfterHook<R, P>>) -> &mut Self {
        self.after_all.push(hook);
        self
    }

    pub fn after(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn DineAfterHook<R, P>>,
    ) -> &mut Self {
        self.after_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn error_all(&mut self, hook: Arc<dyn DineErrorHook<R, P>>) -> &mut Self {
        self.error_all.push(hook);
        self
    }

    pub fn error(
        &mut self,
        method: ServiceMethodKind,
        hook: Arc<dyn DineErrorHook<R, P>>,
    ) -> &mut Self {
        self.error_by_method.entry(method).or_default().push(hook);
        self
    }

    pub fn before_create(&mut self, hook: Arc<dyn DineBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Create, hook)
    }

    pub fn before_update(&mut self, hook: Arc<dyn DineBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Update, hook)
    }

    pub fn before_patch(&mut self, hook: Arc<dyn DineBeforeHook<R, P>>) -> &mut Self {
        self.before(ServiceMethodKind::Patch, hook)
    }

    pub fn after_find(&mut self, hook: Arc<dyn DineAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Find, hook)
    }

    pub fn after_get(&mut self, hook: Arc<dyn DineAfterHook<R, P>>) -> &mut Self {
        self.after(ServiceMethodKind::Get, hook)
    }
}

/// `all` hooks first, then the method-specific ones.
pub(crate) fn collect_method_hooks<T: ?Sized>(
    all: &[Arc<T>],
    by_method: &HookMap<T>,
    method: ServiceMethodKind,
) -> Vec<Arc<T>> {
    let mut out: Vec<Arc<T>> = all.to_vec();
    if let Some(hooks) = by_method.get(&method) {
        out.extend(hooks.iter().cloned());
    }
    out
}
