//! End-to-end tests for the REST surface: a real server on an ephemeral
//! port, driven with reqwest.

use std::sync::Arc;

use cart_server::{create_router, AppState};
use cart_store::SqliteGroceryStore;
use serde_json::{json, Value};

async fn spawn_server() -> String {
    let store = SqliteGroceryStore::open_in_memory().unwrap();
    let state = Arc::new(AppState::new(Box::new(store)));
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn create_item(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let resp = client
        .post(format!("{}/items", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json::<Value>().await.unwrap()["item"].clone()
}

#[tokio::test]
async fn create_returns_unique_ids_and_list_is_newest_first() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let first = create_item(&client, &base, json!({"name": "Bananas"})).await;
    let second = create_item(&client, &base, json!({"name": "Milk"})).await;

    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();
    assert!(!first_id.is_empty());
    assert_ne!(first_id, second_id);

    let listing: Value = client
        .get(format!("{}/items", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = listing["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Milk");
    assert_eq!(items[1]["name"], "Bananas");
}

#[tokio::test]
async fn create_applies_defaults() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &base, json!({"name": "Bread"})).await;
    assert_eq!(item["quantity"], 1.0);
    assert_eq!(item["status"], Value::Null);
    assert_eq!(item["type"], "grocery");
    assert_eq!(item["stores"], json!([]));
    assert!(item["created_at"].is_string());
}

#[tokio::test]
async fn patch_applies_only_present_keys() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let item = create_item(
        &client,
        &base,
        json!({
            "name": "Eggs",
            "quantity": 2,
            "status": "pending",
            "aisle": "Dairy",
            "tags": ["dairy"]
        }),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    let resp = client
        .patch(format!("{}/items/{}", base, id))
        .json(&json!({"quantity": 4}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated = resp.json::<Value>().await.unwrap()["item"].clone();
    assert_eq!(updated["quantity"], 4.0);
    assert_eq!(updated["status"], "pending");
    assert_eq!(updated["aisle"], "Dairy");
    assert_eq!(updated["tags"], json!(["dairy"]));
}

#[tokio::test]
async fn idempotent_clear_of_status_and_quantity() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let item = create_item(
        &client,
        &base,
        json!({"name": "Bread", "quantity": 2, "status": "purchased"}),
    )
    .await;
    let id = item["id"].as_str().unwrap();

    for _ in 0..2 {
        let resp = client
            .patch(format!("{}/items/{}", base, id))
            .json(&json!({"status": null, "quantity": 0}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let updated = resp.json::<Value>().await.unwrap()["item"].clone();
        assert_eq!(updated["status"], Value::Null);
        assert_eq!(updated["quantity"], 0.0);
    }
}

#[tokio::test]
async fn purchase_toggle_round_trips() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &base, json!({"name": "Chicken", "status": "pending"})).await;
    let id = item["id"].as_str().unwrap();

    for expected in ["purchased", "pending"] {
        let resp = client
            .patch(format!("{}/items/{}", base, id))
            .json(&json!({"status": expected}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let updated = resp.json::<Value>().await.unwrap()["item"].clone();
        assert_eq!(updated["status"], expected);
    }
}

#[tokio::test]
async fn invalid_transition_is_rejected() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &base, json!({"name": "Master-list item"})).await;
    let id = item["id"].as_str().unwrap();

    let resp = client
        .patch(format!("{}/items/{}", base, id))
        .json(&json!({"status": "purchased"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("transition"));

    // The rejected patch left the item untouched.
    let listing: Value = client
        .get(format!("{}/items", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["items"][0]["status"], Value::Null);
}

#[tokio::test]
async fn missing_ids_yield_404() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let missing = uuid::Uuid::new_v4();

    let resp = client
        .patch(format!("{}/items/{}", base, missing))
        .json(&json!({"quantity": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));

    let resp = client
        .delete(format!("{}/items/{}", base, missing))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Garbage ids behave like missing ones rather than erroring out.
    let resp = client
        .delete(format!("{}/items/not-a-uuid", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_reports_success() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &base, json!({"name": "Gone"})).await;
    let id = item["id"].as_str().unwrap();

    let resp = client
        .delete(format!("{}/items/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let listing: Value = client
        .get(format!("{}/items", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn status_probe_reports_item_count() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    create_item(&client, &base, json!({"name": "One"})).await;
    create_item(&client, &base, json!({"name": "Two"})).await;

    let body: Value = client
        .get(format!("{}/status", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["items"], 2);
}
