use std::sync::Arc;

use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use dine_axum::axum;
use dine_core::errors::DineError;
use dine_core::tenant::TenantContext;
use dine_core::{DineApp, DineService, ServiceCapabilities, ServiceMethodKind};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

struct UnprocessableOnCreate;

#[async_trait::async_trait]
impl DineService<Value, ()> for UnprocessableOnCreate {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::from_methods(vec![ServiceMethodKind::Create])
    }

    async fn create(&self, _ctx: &TenantContext, _data: Value, _params: ()) -> anyhow::Result<Value> {
        Err(DineError::unprocessable("Invalid")
            .with_errors(json!({"customer_name": ["required"]}))
            .into_anyhow())
    }
}

struct BoomOnCreate;

#[async_trait::async_trait]
impl DineService<Value, ()> for BoomOnCreate {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::from_methods(vec![ServiceMethodKind::Create])
    }

    async fn create(&self, _ctx: &TenantContext, _data: Value, _params: ()) -> anyhow::Result<Value> {
        Err(anyhow::anyhow!("boom"))
    }
}

/// Echoes the tenant it was called with.
struct TenantEcho;

#[async_trait::async_trait]
impl DineService<Value, ()> for TenantEcho {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::read_only()
    }

    async fn find(&self, ctx: &TenantContext, _params: ()) -> anyhow::Result<Vec<Value>> {
        Ok(vec![json!({"tenant": ctx.as_str()})])
    }
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn malformed_json_returns_bad_request() {
    let app: DineApp<Value, ()> = DineApp::new();
    let router = axum(app)
        .use_service("/orders", Arc::new(BoomOnCreate))
        .into_router();

    let res = router
        .oneshot(post("/orders", "{\"customer_name\":\"x\""))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await;
    assert_eq!(body["name"], "BadRequest");
    assert_eq!(body["code"], 400);
    assert_eq!(body["className"], "bad-request");
    assert!(body.get("errors").is_some());
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let app: DineApp<Value, ()> = DineApp::new();
    let router = axum(app)
        .use_service("/orders", Arc::new(BoomOnCreate))
        .into_router();

    let provided = HeaderValue::from_static("req-test-123");
    let mut req = post("/orders", "{\"customer_name\":\"Sam\"}");
    req.headers_mut().insert("x-request-id", provided.clone());

    let res = router.oneshot(req).await.unwrap();

    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}

#[tokio::test]
async fn unprocessable_keeps_status_and_shape() {
    let app: DineApp<Value, ()> = DineApp::new();
    let router = axum(app)
        .use_service("/orders", Arc::new(UnprocessableOnCreate))
        .into_router();

    let res = router
        .oneshot(post("/orders", "{\"customer_name\":\"\"}"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Unprocessable");
    assert_eq!(body["className"], "unprocessable");
    assert_eq!(body["errors"], json!({"customer_name": ["required"]}));
}

#[tokio::test]
async fn foreign_errors_become_general_error() {
    let app: DineApp<Value, ()> = DineApp::new();
    let router = axum(app)
        .use_service("/orders", Arc::new(BoomOnCreate))
        .into_router();

    let res = router
        .oneshot(post("/orders", "{\"customer_name\":\"Sam\"}"))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert_eq!(body["name"], "GeneralError");
    assert_eq!(body["message"], "boom");
}

#[tokio::test]
async fn methods_outside_capabilities_are_405() {
    let app: DineApp<Value, ()> = DineApp::new();
    let router = axum(app)
        .use_service("/orders", Arc::new(UnprocessableOnCreate))
        .into_router();

    let res = router
        .oneshot(Request::builder().uri("/orders").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 405);
    let body = json_body(res).await;
    assert_eq!(body["className"], "method-not-allowed");
}

#[tokio::test]
async fn tenant_comes_from_header_with_default_fallback() {
    let app: DineApp<Value, ()> = DineApp::new();
    let router = axum(app)
        .use_service("/menu_items", Arc::new(TenantEcho))
        .into_router();

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/menu_items")
                .header("x-tenant-id", "t-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(res).await, json!([{"tenant": "t-42"}]));

    let res = router
        .oneshot(Request::builder().uri("/menu_items").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(res).await, json!([{"tenant": "default"}]));
}
