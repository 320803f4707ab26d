#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use dine_auth::{AuthOptions, JwtIdentityResolver};
use dine_core::TenantContext;
use dine_delight::services::{internal_params, App};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub app: App,
    pub router: Router,
    tokens: JwtIdentityResolver,
}

pub fn spawn() -> TestApp {
    let ax = dine_delight::build().unwrap();
    let app = ax.app.as_ref().clone();
    let auth = AuthOptions::from_config(&app.config_snapshot());

    TestApp {
        app,
        router: ax.into_router(),
        tokens: JwtIdentityResolver::new(auth.jwt),
    }
}

impl TestApp {
    pub fn token(&self, user_id: &str) -> String {
        self.tokens
            .sign(user_id, Some(&format!("{user_id}@example.com")), 3600)
            .unwrap()
    }

    pub fn bearer(&self, user_id: &str) -> String {
        format!("Bearer {}", self.token(user_id))
    }

    pub async fn send(&self, req: Request<Body>) -> Response {
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// A tenant owned by `owner_id`, created in-process.
    pub async fn tenant(&self, slug: &str, owner_id: &str) -> String {
        let row = self
            .app
            .service("tenants")
            .unwrap()
            .create(
                TenantContext::global(),
                json!({ "name": format!("{slug} kitchen"), "slug": slug, "owner_id": owner_id }),
                internal_params(),
            )
            .await
            .unwrap();
        row["id"].as_str().unwrap().to_string()
    }

    pub async fn rows(&self, service: &str, tenant: TenantContext) -> Vec<Value> {
        self.app
            .service(service)
            .unwrap()
            .find(tenant, internal_params())
            .await
            .unwrap()
    }
}

pub fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

pub fn post(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("POST").uri(uri)
}

pub fn with_json(builder: axum::http::request::Builder, body: Value) -> Request<Body> {
    builder
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(res: Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
