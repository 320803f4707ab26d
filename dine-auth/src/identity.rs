// Credentials and the identities they resolve to.

use std::collections::HashMap;

use dine_core::errors::DineError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    Upstream(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::NotAuthenticated | AuthError::InvalidCredential(_) => 401,
            AuthError::Forbidden => 403,
            AuthError::Upstream(_) => 400,
        }
    }

    /// The Feathers-shaped equivalent for the service pipeline.
    pub fn into_dine(self) -> DineError {
        match self {
            AuthError::NotAuthenticated => DineError::not_authenticated("Not authenticated"),
            AuthError::InvalidCredential(msg) => DineError::not_authenticated(msg),
            AuthError::Forbidden => DineError::forbidden("Forbidden"),
            AuthError::Upstream(e) => DineError::general_error(e.to_string()).with_source(e),
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header value.
pub fn bearer_from_header_value(value: &str) -> Option<String> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

pub fn extract_bearer_token(headers: &HashMap<String, String>) -> Option<String> {
    let v = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))?;
    bearer_from_header_value(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(v: &str) -> HashMap<String, String> {
        HashMap::from([("authorization".to_string(), v.to_string())])
    }

    #[test]
    fn bearer_token_is_parsed() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).as_deref(), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers("bearer  abc ")).as_deref(), Some("abc"));
    }

    #[test]
    fn other_schemes_and_blanks_are_rejected() {
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcg==")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers("abc")), None);
        assert_eq!(extract_bearer_token(&HashMap::new()), None);
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(AuthError::NotAuthenticated.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::Forbidden.into_dine().code(), 403);
        assert_eq!(
            AuthError::Upstream(anyhow::anyhow!("db down")).to_string(),
            "db down"
        );
    }
}
