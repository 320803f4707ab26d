mod common;

use axum::body::Body;
use axum::http::Request;
use common::{json_body, post, spawn, TestApp};
use dine_core::TenantContext;
use dine_delight::functions::grant_super_admin::grant_super_admin;
use dine_delight::services::{internal_params, ParamsExt};
use serde_json::{json, Value};

async fn call(t: &TestApp, name: &str, auth: Option<&str>) -> (u16, Value) {
    let mut req = post(&format!("/functions/v1/{name}"));
    if let Some(user) = auth {
        req = req.header("authorization", t.bearer(user));
    }
    let res = t.send(req.body(Body::empty()).unwrap()).await;
    let status = res.status().as_u16();
    (status, json_body(res).await)
}

async fn roles_of(t: &TestApp, user_id: &str) -> Vec<Value> {
    t.app
        .service("user_roles")
        .unwrap()
        .find(TenantContext::global(), internal_params().eq("user_id", user_id))
        .await
        .unwrap()
}

#[tokio::test]
async fn seeding_twice_keeps_one_demo_restaurant() {
    let t = spawn();

    let (status, first) = call(&t, "seed-demo-data", None).await;
    assert_eq!(status, 200);
    assert_eq!(first["success"], json!(true));
    assert_eq!(first["message"], "Demo data seeded successfully!");
    assert_eq!(first["items_count"], json!(5));

    let (_, second) = call(&t, "seed-demo-data", None).await;
    assert_eq!(second["tenant_id"], first["tenant_id"]);

    let tenant_id = first["tenant_id"].as_str().unwrap();
    let items = t.rows("menu_items", TenantContext::new(tenant_id)).await;
    assert_eq!(items.len(), 5);
    let tenants = t.rows("tenants", TenantContext::global()).await;
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0]["slug"], "demo-burger");
}

#[tokio::test]
async fn grant_replaces_existing_roles() {
    let t = spawn();
    let tenant_id = t.tenant("kept", "carol").await;
    t.app
        .service("user_roles")
        .unwrap()
        .create(
            TenantContext::global(),
            json!({ "user_id": "carol", "role": "owner", "tenant_id": tenant_id }),
            internal_params(),
        )
        .await
        .unwrap();

    let (status, body) = call(&t, "grant-super-admin", Some("carol")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = call(&t, "grant-super-admin", Some("carol")).await;
    assert_eq!(status, 200);

    let roles = roles_of(&t, "carol").await;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["role"], "super_admin");
    assert_eq!(roles[0]["tenant_id"], Value::Null);
}

#[tokio::test]
async fn grant_requires_a_token() {
    let t = spawn();

    let (status, body) = call(&t, "grant-super-admin", None).await;

    assert_eq!(status, 401);
    assert_eq!(body, json!({ "error": "Not authenticated" }));
}

#[tokio::test]
async fn tenant_listing_is_for_super_admins_only() {
    let t = spawn();
    t.tenant("secret", "dave").await;

    let (status, body) = call(&t, "super-admin-tenants", Some("dave")).await;
    assert_eq!(status, 403);
    assert_eq!(body, json!({ "error": "Forbidden" }));

    let (status, _) = call(&t, "super-admin-tenants", None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn tenant_listing_joins_owners_and_subscriptions() {
    let t = spawn();
    grant_super_admin(&t.app, "root").await.unwrap();

    let with_owner = t.tenant("joined", "erin").await;
    let orphan = t.tenant("orphan", "ghost").await;
    t.app
        .service("users")
        .unwrap()
        .create(
            TenantContext::global(),
            json!({ "id": "erin", "email": "erin@example.com" }),
            internal_params(),
        )
        .await
        .unwrap();
    t.app
        .service("subscriptions")
        .unwrap()
        .create(
            TenantContext::global(),
            json!({ "tenant_id": with_owner, "plan": "pro", "status": "active" }),
            internal_params(),
        )
        .await
        .unwrap();

    let (status, body) = call(&t, "super-admin-tenants", Some("root")).await;
    assert_eq!(status, 200);
    let tenants = body["tenants"].as_array().unwrap();
    assert_eq!(tenants.len(), 2);

    let find = |id: &str| tenants.iter().find(|t| t["id"] == id).unwrap().clone();
    let joined = find(&with_owner);
    assert_eq!(joined["owner_email"], "erin@example.com");
    assert_eq!(joined["subscription_plan"], "pro");
    assert_eq!(joined["subscription_status"], "active");

    let lonely = find(&orphan);
    assert_eq!(lonely["owner_email"], Value::Null);
    assert_eq!(lonely["subscription_plan"], Value::Null);
}

#[tokio::test]
async fn preflight_is_open_to_any_origin() {
    let t = spawn();

    let res = t
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/functions/v1/seed-demo-data")
                .header("origin", "https://somewhere.example")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "authorization, content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
