pub mod tenants_hooks;
pub mod tenants_shared;

pub use tenants_hooks::is_valid_slug;
