//! dine-axum: Axum adapter for Dine Delight.
//!
//! Builds Axum routers from `DineApp` services, maps `DineError` to HTTP
//! responses and resolves the tenant slug from the request host.

pub mod app;
pub mod host;
pub mod layers;
pub mod params;
pub mod rest;
pub mod state;
mod error;
pub use error::DineAxumError;
pub use state::DineAxumState;

pub use app::{axum, AxumApp};
