// JWT identity resolution.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::identity::{AuthError, Identity};
use crate::options::{JwtAlgorithm, JwtOptions};

/// Claims carried by access tokens.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Turns a bearer credential into an identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError>;
}

fn algorithm(alg: JwtAlgorithm) -> Algorithm {
    match alg {
        JwtAlgorithm::HS256 => Algorithm::HS256,
        JwtAlgorithm::HS384 => Algorithm::HS384,
        JwtAlgorithm::HS512 => Algorithm::HS512,
    }
}

/// Verifies HMAC-signed access tokens against the configured audience.
#[derive(Clone, Debug)]
pub struct JwtIdentityResolver {
    options: JwtOptions,
}

impl JwtIdentityResolver {
    pub fn new(options: JwtOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JwtOptions {
        &self.options
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(algorithm(self.options.algorithm));
        validation.set_audience(&[self.options.audience.as_str()]);
        validation.leeway = self.options.leeway_seconds;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.options.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidCredential(e.to_string()))
    }

    /// Mint an access token for `user_id`, valid for `ttl_seconds`.
    pub fn sign(
        &self,
        user_id: &str,
        email: Option<&str>,
        ttl_seconds: i64,
    ) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            aud: self.options.audience.clone(),
            exp: now + ttl_seconds,
            iat: now,
        };

        let token = encode(
            &Header::new(algorithm(self.options.algorithm)),
            &claims,
            &EncodingKey::from_secret(self.options.secret.as_bytes()),
        )?;
        Ok(token)
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.verify(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidCredential("token has no subject".into()));
        }
        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
