// Authentication options and configuration.

use dine_core::DineConfigSnapshot;
use serde::{Deserialize, Serialize};

pub const DEFAULT_JWT_SECRET: &str = "dine-delight-dev-secret-change-me";
pub const DEFAULT_AUDIENCE: &str = "authenticated";
pub const DEFAULT_LOGIN_PATH: &str = "/auth";

/// HMAC algorithms accepted for access tokens.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum JwtAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl JwtAlgorithm {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Some(Self::HS256),
            "HS384" => Some(Self::HS384),
            "HS512" => Some(Self::HS512),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtOptions {
    pub secret: String,
    pub audience: String,
    pub algorithm: JwtAlgorithm,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_seconds: u64,
}

impl Default for JwtOptions {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            algorithm: JwtAlgorithm::HS256,
            leeway_seconds: 30,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthOptions {
    pub jwt: JwtOptions,
    /// Where unauthenticated admin visitors are sent. Never guarded.
    pub login_path: String,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            jwt: JwtOptions::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl AuthOptions {
    /// Read `auth.*` keys, falling back to the defaults.
    pub fn from_config(cfg: &DineConfigSnapshot) -> Self {
        let mut out = Self::default();

        if let Some(secret) = cfg.get_string("auth.jwt.secret") {
            out.jwt.secret = secret;
        }
        if let Some(aud) = cfg.get_string("auth.jwt.audience") {
            out.jwt.audience = aud;
        }
        if let Some(alg) = cfg.get("auth.jwt.algorithm").and_then(JwtAlgorithm::parse) {
            out.jwt.algorithm = alg;
        }
        if let Some(leeway) = cfg.get_usize("auth.jwt.leeway_seconds") {
            out.jwt.leeway_seconds = leeway as u64;
        }
        if let Some(path) = cfg.get_string("auth.login_path") {
            out.login_path = path;
        }

        out
    }
}
