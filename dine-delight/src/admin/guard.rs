use axum::body::Body;
use axum::extract::{OriginalUri, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use dine_auth::{bearer_from_header_value, GuardDecision, Session, SessionGuard, SessionStore};
use serde_json::json;

use crate::context::AppContext;

pub const ACCESS_TOKEN_COOKIE: &str = "dine-access-token";

/// Bearer header first, then the session cookie.
pub fn access_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_from_header_value)
        .or_else(|| {
            jar.get(ACCESS_TOKEN_COOKIE)
                .map(|c| c.value().trim().to_string())
                .filter(|t| !t.is_empty())
        })
}

fn current_session(ctx: &AppContext, headers: &HeaderMap, jar: &CookieJar) -> Option<Session> {
    let token = access_token(headers, jar)?;
    match ctx.identities.verify(&token) {
        Ok(claims) => Some(Session {
            identity: dine_auth::Identity {
                user_id: claims.sub,
                email: claims.email,
            },
            access_token: token,
        }),
        Err(err) => {
            tracing::debug!(error = %err, "session token rejected");
            None
        }
    }
}

/// Admin routes render only with a session; everyone else is sent to
/// the login path with `303 See Other`.
pub async fn require_session(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|u| u.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let store = SessionStore::new(current_session(&ctx, req.headers(), &jar));
    let mut guard = SessionGuard::new(ctx.auth.login_path.clone());
    guard.mount(&store).await;
    let decision = guard.decision(&path);
    guard.teardown();

    match decision {
        GuardDecision::Render(session) => {
            let mut req = req;
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        GuardDecision::Unguarded => next.run(req).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(%path, %to, "no session, redirecting");
            Redirect::to(&to).into_response()
        }
        GuardDecision::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "view": "loading" })),
        )
            .into_response(),
    }
}
