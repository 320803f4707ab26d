//! dine-core: framework-agnostic core for Dine Delight.
//!
//! Named services, a Feathers-style hook pipeline, string config and
//! the tenant context every call carries.

pub mod app;
pub mod config;
pub mod errors;
pub mod hooks;
pub mod registry;
pub mod service;
pub mod tenant;

#[cfg(feature = "adapters")]
pub mod adapters;

pub use app::{DineApp, ServiceCaller, ServiceHandle};
pub use config::{DineConfig, DineConfigSnapshot};
pub use errors::{DineError, ErrorKind};
pub use hooks::{
    DineAfterHook, DineAroundHook, DineBeforeHook, DineErrorHook, HookContext, HookResult, Next,
    ServiceHooks,
};
pub use registry::DineServiceRegistry;
pub use service::{DineService, ServiceCapabilities, ServiceMethodKind};
pub use tenant::{TenantContext, TenantId};
