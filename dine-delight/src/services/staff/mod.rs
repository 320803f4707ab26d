pub mod staff_hooks;
pub mod staff_shared;
