pub mod orders_hooks;
pub mod orders_shared;
