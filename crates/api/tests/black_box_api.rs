use reqwest::StatusCode;
use serde_json::json;

use backshop_api::app::{self, AppServices};
use backshop_api::config::ErrorCodes;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory storage, bound to an ephemeral port.
        let app = app::build_app(AppServices::in_memory(), ErrorCodes::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_item(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    price: u64,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/items", base_url))
        .json(&json!({ "data": { "name": name, "price": price } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn record_movement(
    client: &reqwest::Client,
    base_url: &str,
    item_id: i64,
    qty: u32,
    direction: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/inventory", base_url))
        .json(&json!({ "data": { "itemId": item_id, "qty": qty, "type": direction } }))
        .send()
        .await
        .unwrap()
}

async fn create_order(
    client: &reqwest::Client,
    base_url: &str,
    item_id: i64,
    qty: u32,
) -> reqwest::Response {
    client
        .post(format!("{}/order", base_url))
        .json(&json!({ "data": { "itemId": item_id, "qty": qty } }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn item_crud_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_item(&client, &srv.base_url, "Shoe", 25).await;
    assert_eq!(created["data"]["id"], 1);
    assert_eq!(created["data"]["name"], "Shoe");
    assert_eq!(created["data"]["price"], 25);

    let res = client
        .get(format!("{}/items/1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["remainingStock"], 0);

    let res = client
        .put(format!("{}/items/1", srv.base_url))
        .json(&json!({ "data": { "name": "Boot", "price": 30 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Boot");

    let res = client
        .delete(format!("{}/items/1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/items/1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errorCode"], "ORG-001-991");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn stock_follows_movements_and_guards_withdrawals() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_item(&client, &srv.base_url, "Shoe", 25).await;

    let res = record_movement(&client, &srv.base_url, 1, 10, "T").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["type"], "T");
    assert_eq!(body["data"]["qty"], 10);

    let res = record_movement(&client, &srv.base_url, 1, 4, "w").await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/items/1", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["remainingStock"], 6);

    // Withdrawing past the fold is a conflict, and the ledger is unchanged.
    let res = record_movement(&client, &srv.base_url, 1, 7, "W").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errorCode"], "ORG-001-992");

    let res = client
        .get(format!("{}/items/1", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["remainingStock"], 6);
}

#[tokio::test]
async fn order_lifecycle_against_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_item(&client, &srv.base_url, "Shoe", 3).await;
    let res = record_movement(&client, &srv.base_url, 1, 6, "T").await;
    assert_eq!(res.status(), StatusCode::OK);

    // Too much: conflict, nothing persisted.
    let res = create_order(&client, &srv.base_url, 1, 7).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errorCode"], "ORG-001-992");

    let res = client
        .get(format!("{}/order", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["totalItems"], 0);

    // Within stock: price is snapshotted as qty * unit price.
    let res = create_order(&client, &srv.base_url, 1, 5).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["orderNo"], "O1");
    assert_eq!(body["data"]["qty"], 5);
    assert_eq!(body["data"]["price"], 15);

    // Lookup is case-insensitive.
    let res = client
        .get(format!("{}/order/o1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["orderNo"], "O1");

    // Update keeps the number identity and the caller-supplied casing.
    let res = client
        .put(format!("{}/order/o1", srv.base_url))
        .json(&json!({ "data": { "itemId": 1, "qty": 4 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["orderNo"], "o1");
    assert_eq!(body["data"]["price"], 12);

    let res = client
        .delete(format!("{}/order/O1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/order/o1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_numbers_ascend_across_creates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_item(&client, &srv.base_url, "Shoe", 1).await;
    let res = record_movement(&client, &srv.base_url, 1, 100, "T").await;
    assert_eq!(res.status(), StatusCode::OK);

    for expected in ["O1", "O2", "O3"] {
        let res = create_order(&client, &srv.base_url, 1, 1).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["data"]["orderNo"], expected);
    }

    // Default paging is page=0, size=2.
    let res = client
        .get(format!("{}/order", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["totalItems"], 3);
    assert_eq!(body["data"]["totalPages"], 2);

    let res = client
        .get(format!("{}/order?page=1&size=2", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["orders"][0]["orderNo"], "O3");
}

#[tokio::test]
async fn stock_gate_fires_before_item_existence() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // No such item, quantity 0: passes the stock gate, then not-found.
    let res = create_order(&client, &srv.base_url, 99, 0).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // No such item, positive quantity: the stock gate answers first.
    let res = create_order(&client, &srv.base_url, 99, 3).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_input_is_rejected_with_a_validation_code() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Negative quantity fails deserialization before reaching the core.
    let res = client
        .post(format!("{}/order", srv.base_url))
        .json(&json!({ "data": { "itemId": 1, "qty": -1 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errorCode"], "ORG-001-993");

    // Blank item names are refused.
    let res = client
        .post(format!("{}/items", srv.base_url))
        .json(&json!({ "data": { "name": "   ", "price": 5 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown movement direction letters are refused.
    let res = record_movement(&client, &srv.base_url, 1, 5, "X").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Bodies without the data envelope are refused.
    let res = client
        .post(format!("{}/items", srv.base_url))
        .json(&json!({ "name": "Shoe", "price": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A zero page size never reaches storage.
    let res = client
        .get(format!("{}/items?size=0", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movement_update_and_delete_by_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = record_movement(&client, &srv.base_url, 1, 10, "T").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let id = body["data"]["id"].as_i64().unwrap();

    // Replacing the record is checked with the replacement applied: a
    // withdrawal larger than what the rest of the ledger carries loses.
    let res = client
        .put(format!("{}/inventory/{}", srv.base_url, id))
        .json(&json!({ "data": { "itemId": 1, "qty": 3, "type": "W" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .put(format!("{}/inventory/{}", srv.base_url, id))
        .json(&json!({ "data": { "itemId": 1, "qty": 8, "type": "T" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["qty"], 8);

    let res = client
        .delete(format!("{}/inventory/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/inventory/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/inventory/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
