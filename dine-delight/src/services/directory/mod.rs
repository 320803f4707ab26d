//! Tables only the platform itself touches: roles, billing and the
//! auth user directory.

pub mod directory_hooks;
pub mod directory_shared;
