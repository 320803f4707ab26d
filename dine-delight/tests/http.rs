mod common;

use axum::body::Body;
use common::{get, json_body, post, spawn, with_json};
use dine_core::TenantContext;
use http_body_util::BodyExt;
use serde_json::json;

#[tokio::test]
async fn health_ok() {
    let t = spawn();

    let res = t.send(get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(res.status().as_u16(), 200);
    assert!(res.headers().get("x-request-id").is_some());
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "ok");
}

#[tokio::test]
async fn rest_calls_need_a_bearer_token() {
    let t = spawn();

    let res = t.send(get("/tenants").body(Body::empty()).unwrap()).await;
    assert_eq!(res.status().as_u16(), 401);
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotAuthenticated");

    let res = t
        .send(
            get("/tenants")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status().as_u16(), 401);
}

#[tokio::test]
async fn owners_only_see_their_own_tenants() {
    let t = spawn();

    let res = t
        .send(with_json(
            post("/tenants").header("authorization", t.bearer("alice")),
            json!({ "name": "Pasta Place", "slug": "pasta-place", "owner_id": "mallory" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let created = json_body(res).await;
    assert_eq!(created["owner_id"], "alice");
    assert!(created["created_at"].is_string());
    let id = created["id"].as_str().unwrap().to_string();

    let res = t
        .send(get("/tenants").header("authorization", t.bearer("bob")).body(Body::empty()).unwrap())
        .await;
    assert_eq!(json_body(res).await, json!([]));

    let res = t
        .send(
            get(&format!("/tenants/{id}"))
                .header("authorization", t.bearer("bob"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status().as_u16(), 404);

    let res = t
        .send(get("/tenants").header("authorization", t.bearer("alice")).body(Body::empty()).unwrap())
        .await;
    let rows = json_body(res).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn tenant_slugs_are_validated_and_unique() {
    let t = spawn();
    t.tenant("taken", "someone").await;

    let res = t
        .send(with_json(
            post("/tenants").header("authorization", t.bearer("alice")),
            json!({ "name": "Bad", "slug": "Not A Slug" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["className"], "unprocessable");
    assert!(body["errors"]["slug"].is_array());

    let res = t
        .send(with_json(
            post("/tenants").header("authorization", t.bearer("alice")),
            json!({ "name": "Again", "slug": "taken" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 409);
}

#[tokio::test]
async fn menu_items_are_confined_to_the_callers_tenant() {
    let t = spawn();
    let tenant_id = t.tenant("alices", "alice").await;

    let res = t
        .send(with_json(
            post("/menu_items")
                .header("authorization", t.bearer("bob"))
                .header("x-tenant-id", &tenant_id),
            json!({ "name": "Soup", "price": 5 }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 403);

    let res = t
        .send(with_json(
            post("/menu_items")
                .header("authorization", t.bearer("alice"))
                .header("x-tenant-id", &tenant_id),
            json!({ "name": "Soup", "price": "4.5", "tenant_id": "elsewhere" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let item = json_body(res).await;
    assert_eq!(item["tenant_id"], tenant_id.as_str());
    assert_eq!(item["price"], json!(4.5));
    assert_eq!(item["is_available"], json!(true));

    let res = t
        .send(with_json(
            post("/menu_items")
                .header("authorization", t.bearer("alice"))
                .header("x-tenant-id", &tenant_id),
            json!({ "price": -1 }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["errors"]["name"], json!(["is required"]));
    assert_eq!(body["errors"]["price"], json!(["must not be negative"]));
}

#[tokio::test]
async fn order_status_moves_one_step_at_a_time() {
    let t = spawn();
    let tenant_id = t.tenant("stepper", "alice").await;
    let auth = t.bearer("alice");

    let res = t
        .send(with_json(
            post("/orders")
                .header("authorization", &auth)
                .header("x-tenant-id", &tenant_id),
            json!({
                "customer_name": "  Sam ",
                "table_number": 7,
                "total_amount": 1000,
                "items": [
                    { "id": "m1", "name": "Burger", "price": 12.99, "quantity": 2 },
                    { "id": "m2", "name": "Fries", "price": 4.99, "quantity": 1 }
                ]
            }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let order = json_body(res).await;
    assert_eq!(order["customer_name"], "Sam");
    assert_eq!(order["table_number"], "7");
    assert_eq!(order["total_amount"], json!(30.97));
    assert_eq!(order["status"], "new");
    let id = order["id"].as_str().unwrap().to_string();

    let patch = |status: &str| {
        with_json(
            axum::http::Request::builder()
                .method("PATCH")
                .uri(format!("/orders/{id}"))
                .header("authorization", &auth)
                .header("x-tenant-id", &tenant_id),
            json!({ "status": status }),
        )
    };

    let res = t.send(patch("ready")).await;
    assert_eq!(res.status().as_u16(), 409);

    let res = t.send(patch("preparing")).await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(json_body(res).await["status"], "preparing");

    let res = t
        .send(with_json(
            axum::http::Request::builder()
                .method("PUT")
                .uri(format!("/orders/{id}"))
                .header("authorization", &auth)
                .header("x-tenant-id", &tenant_id),
            json!({ "customer_name": "X" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 405);

    let stored = t.rows("orders", TenantContext::new(tenant_id.as_str())).await;
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn empty_orders_are_rejected() {
    let t = spawn();
    let tenant_id = t.tenant("empty", "alice").await;

    let res = t
        .send(with_json(
            post("/orders")
                .header("authorization", t.bearer("alice"))
                .header("x-tenant-id", &tenant_id),
            json!({ "customer_name": "Sam", "items": [] }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["errors"]["items"], json!(["must not be empty"]));
}

#[tokio::test]
async fn staff_members_start_invited() {
    let t = spawn();
    let tenant_id = t.tenant("crew", "alice").await;

    let res = t
        .send(with_json(
            post("/staff")
                .header("authorization", t.bearer("alice"))
                .header("x-tenant-id", &tenant_id),
            json!({ "name": "Kim", "email": "kim@example.com" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 200);
    let member = json_body(res).await;
    assert_eq!(member["role"], "staff");
    assert_eq!(member["status"], "invited");

    let res = t
        .send(with_json(
            post("/staff")
                .header("authorization", t.bearer("alice"))
                .header("x-tenant-id", &tenant_id),
            json!({ "name": "Lee", "email": "nope", "role": "chef" }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["role"].is_array());
}

#[tokio::test]
async fn directory_tables_are_not_routed() {
    let t = spawn();

    let res = t
        .send(get("/user_roles").header("authorization", t.bearer("alice")).body(Body::empty()).unwrap())
        .await;
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn oversized_order_totals_are_rejected() {
    let t = spawn();
    let tenant_id = t.tenant("bullion", "alice").await;

    let res = t
        .send(with_json(
            post("/orders")
                .header("authorization", t.bearer("alice"))
                .header("x-tenant-id", &tenant_id),
            json!({
                "customer_name": "Sam",
                "items": [{ "id": "g", "name": "Gold", "price": 1.0e15, "quantity": 1000 }]
            }),
        ))
        .await;

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["errors"]["total_amount"], json!(["is too large"]));

    let stored = t.rows("orders", TenantContext::new(tenant_id.as_str())).await;
    assert!(stored.is_empty());
}
