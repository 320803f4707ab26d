mod common;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use common::{get, json_body, post, spawn, with_json, TestApp};
use dine_core::{DineBeforeHook, DineError, HookContext, ServiceMethodKind, TenantContext};
use dine_delight::functions::seed_demo;
use dine_delight::services::{internal_params, DineParams};
use serde_json::{json, Value};

/// Fails every `find` on the service it is attached to.
struct BackendDown;

#[async_trait]
impl DineBeforeHook<Value, DineParams> for BackendDown {
    async fn run(&self, _ctx: &mut HookContext<Value, DineParams>) -> Result<()> {
        Err(DineError::unavailable("backend unreachable").into_anyhow())
    }
}

fn fail_finds(t: &TestApp, service: &str) {
    t.app.service(service).unwrap().hooks(|h| {
        h.before(ServiceMethodKind::Find, Arc::new(BackendDown));
    });
}

async fn storefront(t: &TestApp, host: &str) -> (u16, Value) {
    let res = t
        .send(get("/").header("host", host).body(Body::empty()).unwrap())
        .await;
    let status = res.status().as_u16();
    (status, json_body(res).await)
}

fn item_id(menu: &Value, name: &str) -> String {
    menu["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == name)
        .and_then(|i| i["id"].as_str())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn bare_and_reserved_hosts_show_the_landing_page() {
    let t = spawn();

    for host in ["localhost", "www.localhost", "localhost:3030"] {
        let (status, body) = storefront(&t, host).await;
        assert_eq!(status, 200, "{host}");
        assert_eq!(body["view"], "landing", "{host}");
    }
}

#[tokio::test]
async fn unknown_restaurant_is_not_found() {
    let t = spawn();

    let (status, body) = storefront(&t, "nowhere.localhost").await;

    assert_eq!(status, 404);
    assert_eq!(body["view"], "not_found");
    assert_eq!(body["slug"], "nowhere");
    assert_eq!(body["notice"]["title"], "Restaurant not found");
    assert_eq!(body["notice"]["kind"], "error");
}

#[tokio::test]
async fn guest_orders_from_the_demo_menu() {
    let t = spawn();
    let seeded = seed_demo(&t.app).await.unwrap();

    let (status, menu) = storefront(&t, "demo-burger.localhost").await;
    assert_eq!(status, 200);
    assert_eq!(menu["view"], "menu");
    assert_eq!(menu["tenant"]["id"], seeded.tenant_id.as_str());
    assert_eq!(menu["items"].as_array().unwrap().len(), 5);
    assert!(menu["notice"].is_null());

    let res = t
        .send(with_json(
            post("/orders/checkout").header("host", "demo-burger.localhost"),
            json!({
                "customer_name": " Sam ",
                "table_number": "4",
                "items": [
                    { "id": item_id(&menu, "Burger"), "quantity": 1 },
                    { "id": item_id(&menu, "Fries"), "quantity": 1 }
                ]
            }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 201);
    let body = json_body(res).await;
    assert_eq!(body["order"]["customer_name"], "Sam");
    assert_eq!(body["order"]["table_number"], "4");
    assert_eq!(body["order"]["status"], "new");
    assert_eq!(body["order"]["total_amount"], json!(17.98));
    assert_eq!(body["order"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["notice"]["title"], "Order sent to kitchen!");
    assert_eq!(body["cart"]["items"], json!([]));
    assert_eq!(body["dialog_open"], json!(false));

    let orders = t
        .rows("orders", TenantContext::new(seeded.tenant_id.as_str()))
        .await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["tenant_id"], seeded.tenant_id.as_str());
}

#[tokio::test]
async fn checkout_needs_a_name() {
    let t = spawn();
    let seeded = seed_demo(&t.app).await.unwrap();
    let (_, menu) = storefront(&t, "demo-burger.localhost").await;

    let res = t
        .send(with_json(
            post("/orders/checkout").header("host", "demo-burger.localhost"),
            json!({
                "customer_name": "   ",
                "items": [{ "id": item_id(&menu, "Wings"), "quantity": 2 }]
            }),
        ))
        .await;

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["notice"]["title"], "Please enter your name");
    assert_eq!(body["dialog_open"], json!(true));
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);

    let orders = t
        .rows("orders", TenantContext::new(seeded.tenant_id.as_str()))
        .await;
    assert!(orders.is_empty());
}

#[tokio::test]
async fn checkout_with_an_empty_cart_is_refused() {
    let t = spawn();
    seed_demo(&t.app).await.unwrap();

    let res = t
        .send(with_json(
            post("/orders/checkout").header("host", "demo-burger.localhost"),
            json!({ "customer_name": "Sam", "items": [] }),
        ))
        .await;

    assert_eq!(res.status().as_u16(), 422);
    assert_eq!(json_body(res).await["notice"]["title"], "Your cart is empty");
}

#[tokio::test]
async fn unavailable_items_are_hidden_and_refused() {
    let t = spawn();
    let seeded = seed_demo(&t.app).await.unwrap();
    let hidden = t
        .app
        .service("menu_items")
        .unwrap()
        .create(
            TenantContext::new(seeded.tenant_id.as_str()),
            json!({ "name": "Milkshake", "price": 5.5, "is_available": false }),
            internal_params(),
        )
        .await
        .unwrap();
    let hidden_id = hidden["id"].as_str().unwrap().to_string();

    let (_, menu) = storefront(&t, "demo-burger.localhost").await;
    let names: Vec<&str> = menu["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["name"].as_str())
        .collect();
    assert_eq!(names.len(), 5);
    assert!(!names.contains(&"Milkshake"));

    let res = t
        .send(with_json(
            post("/orders/checkout").header("host", "demo-burger.localhost"),
            json!({ "customer_name": "Sam", "items": [{ "id": hidden_id, "quantity": 1 }] }),
        ))
        .await;
    assert_eq!(res.status().as_u16(), 422);
    assert_eq!(
        json_body(res).await["notice"]["title"],
        "Failed to place order. Please try again."
    );
}

#[tokio::test]
async fn menus_do_not_leak_between_restaurants() {
    let t = spawn();
    seed_demo(&t.app).await.unwrap();
    t.tenant("quiet-cafe", "alice").await;

    let (status, body) = storefront(&t, "quiet-cafe.localhost").await;

    assert_eq!(status, 200);
    assert_eq!(body["tenant"]["slug"], "quiet-cafe");
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn failed_tenant_lookup_shows_not_found() {
    let t = spawn();
    seed_demo(&t.app).await.unwrap();
    fail_finds(&t, "tenants");

    let (status, body) = storefront(&t, "demo-burger.localhost").await;

    assert_eq!(status, 404);
    assert_eq!(body["view"], "not_found");
    assert_eq!(body["slug"], "demo-burger");
    assert_eq!(body["notice"]["title"], "Restaurant not found");
}

#[tokio::test]
async fn failed_menu_load_shows_an_error_and_no_items() {
    let t = spawn();
    seed_demo(&t.app).await.unwrap();
    fail_finds(&t, "menu_items");

    let (status, body) = storefront(&t, "demo-burger.localhost").await;

    assert_eq!(status, 200);
    assert_eq!(body["view"], "menu");
    assert_eq!(body["tenant"]["slug"], "demo-burger");
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["notice"]["title"], "Error loading menu");
    assert_eq!(body["notice"]["kind"], "error");
}

#[tokio::test]
async fn oversized_checkout_is_refused_without_an_order() {
    let t = spawn();
    let seeded = seed_demo(&t.app).await.unwrap();
    let gold = t
        .app
        .service("menu_items")
        .unwrap()
        .create(
            TenantContext::new(seeded.tenant_id.as_str()),
            json!({ "name": "Gold", "price": 1.0e15 }),
            internal_params(),
        )
        .await
        .unwrap();

    let res = t
        .send(with_json(
            post("/orders/checkout").header("host", "demo-burger.localhost"),
            json!({
                "customer_name": "Sam",
                "items": [{ "id": gold["id"], "quantity": 100000 }]
            }),
        ))
        .await;

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["notice"]["title"], "Order total is too large");
    assert_eq!(body["dialog_open"], json!(true));
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);

    let orders = t
        .rows("orders", TenantContext::new(seeded.tenant_id.as_str()))
        .await;
    assert!(orders.is_empty());
}
