pub mod authenticate;

pub use authenticate::{AuthParams, AuthenticateHook, AuthenticateHookParams};
