//! dine-auth: who is calling, and may they.
//!
//! - bearer credential parsing and JWT identity resolution
//! - the `authenticate` before-hook for external service calls
//! - the role gate used by privileged functions
//! - the session guard state machine for admin views

pub mod authorize;
pub mod identity;
pub mod guard;
pub mod hooks;
pub mod jwt;
pub mod options;

pub use authorize::*;
pub use identity::*;
pub use guard::*;
pub use hooks::*;
pub use jwt::*;
pub use options::*;
