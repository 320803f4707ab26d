//! Login entry point and session cookie. Never behind the guard.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dine_auth::{Identity, IdentityResolver};
use serde::Deserialize;
use serde_json::json;

use crate::admin::guard::{access_token, ACCESS_TOKEN_COOKIE};
use crate::context::AppContext;

pub fn router(ctx: AppContext) -> Router<()> {
    let login_path = ctx.auth.login_path.clone();
    let session_path = format!("{}/session", login_path.trim_end_matches('/'));

    Router::new()
        .route(&login_path, get(login))
        .route(&session_path, post(sign_in).delete(sign_out))
        .with_state(ctx)
}

async fn login(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "view": "login",
        "login_path": ctx.auth.login_path,
        "session_path": format!("{}/session", ctx.auth.login_path.trim_end_matches('/')),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SignIn {
    #[serde(default)]
    pub access_token: Option<String>,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Not authenticated" })),
    )
        .into_response()
}

/// Trade a valid access token for the session cookie.
async fn sign_in(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Result<Json<SignIn>, JsonRejection>,
) -> Response {
    let from_body = body.ok().and_then(|Json(b)| b.access_token);
    let Some(token) = from_body.or_else(|| access_token(&headers, &jar)) else {
        return unauthorized();
    };

    let identity: Identity = match ctx.identities.resolve(&token).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::debug!(error = %err, "sign in rejected");
            return unauthorized();
        }
    };

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    tracing::info!(user = %identity.user_id, "signed in");
    (jar.add(cookie), Json(json!({ "user": identity }))).into_response()
}

async fn sign_out(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}
