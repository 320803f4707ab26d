//! Guarded admin surface under `/app`.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::context::AppContext;

pub mod board;
pub mod dashboard;
pub mod guard;
pub mod tenant;

pub use guard::{require_session, ACCESS_TOKEN_COOKIE};

pub fn router(ctx: AppContext) -> Router<()> {
    Router::new()
        .route("/dashboard", get(dashboard::handler))
        .route("/orders/board", get(board::handler))
        .route("/orders/{id}/advance", post(board::advance))
        .layer(from_fn_with_state(ctx.clone(), require_session))
        .with_state(ctx)
}
