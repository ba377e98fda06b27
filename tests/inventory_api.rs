use std::{collections::HashMap, sync::Arc};

use reqwest::StatusCode;
use serde_json::{json, Value};
use wms_backend::{
    app::build_app,
    config::{AppConfig, AppState},
    db::{MemoryStore, Stores},
};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let vars: HashMap<&str, &str> = HashMap::from([("STORAGE_BACKEND", "memory")]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("memory config");

        // Mesmo router de produção, com o store em memória e porta efêmera.
        let state = AppState::with_stores(config, Stores::memory(Arc::new(MemoryStore::new())));
        let app = build_app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.patch(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    // Hub 1 + SKU "X1" para (t1, s1).
    async fn seed(&self) -> i64 {
        let (status, hub) = self
            .post(
                "/api/v1/hubs/create",
                json!({ "tenant_id": "t1", "name": "Galpao Norte", "location": { "city": "Recife" } }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = self
            .post(
                "/api/v1/skus/create",
                json!({ "tenant_id": "t1", "seller_id": "s1", "sku_code": "X1", "name": "Caneta" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        hub["id"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn level(hub_id: i64, quantity: i64) -> Value {
    json!({
        "tenant_id": "t1",
        "seller_id": "s1",
        "sku_code": "X1",
        "hub_id": hub_id,
        "quantity": quantity,
    })
}

#[tokio::test]
async fn health_is_served_at_root_and_under_v1() {
    let server = TestServer::spawn().await;

    for path in ["/health", "/api/v1/health"] {
        let res = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "message": "service is healthy", "data": { "status": "healthy" } })
        );
    }
}

#[tokio::test]
async fn create_upsert_then_overdraw_keeps_quantity() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let (status, created) = server.post("/api/v1/inventory/create", level(hub_id, 50)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["quantity"], 50);
    assert_eq!(created["hub_id"], hub_id);

    let (status, upserted) = server.patch("/api/v1/inventory/upsert", level(hub_id, 80)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upserted["id"], created["id"]);
    assert_eq!(upserted["quantity"], 80);

    let (status, err) = server
        .patch(
            "/api/v1/inventory/update-quantity",
            json!({ "hub_id": hub_id, "seller_id": "s1", "sku_code": "X1", "quantity": -100 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "INSUFFICIENT_STOCK");

    let (status, list) = server
        .post(
            "/api/v1/inventory/get",
            json!({ "tenant_id": "t1", "seller_id": "s1", "hub_id": hub_id, "sku_codes": ["X1"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
    assert_eq!(list["items"][0]["quantity"], 80);
    assert_eq!(list["items"][0]["sku_code"], "X1");
}

#[tokio::test]
async fn update_quantity_returns_message_and_record() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;
    server.post("/api/v1/inventory/create", level(hub_id, 10)).await;

    let (status, body) = server
        .patch(
            "/api/v1/inventory/update-quantity",
            json!({ "hub_id": hub_id, "seller_id": "s1", "sku_code": "X1", "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Inventory quantity updated successfully");
    assert_eq!(body["inventory"]["quantity"], 15);
}

#[tokio::test]
async fn duplicate_create_is_conflict() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let (status, _) = server.post("/api/v1/inventory/create", level(hub_id, 5)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = server.post("/api/v1/inventory/create", level(hub_id, 9)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], "INVENTORY_ALREADY_EXISTS");
}

#[tokio::test]
async fn unknown_sku_hub_and_record_are_not_found() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let mut unknown_sku = level(hub_id, 1);
    unknown_sku["sku_code"] = json!("NOPE");
    let (status, err) = server.post("/api/v1/inventory/create", unknown_sku).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "SKU_NOT_FOUND");

    let (status, err) = server.patch("/api/v1/inventory/upsert", level(hub_id + 100, 1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "HUB_NOT_FOUND");

    let (status, err) = server
        .patch(
            "/api/v1/inventory/update-quantity",
            json!({ "hub_id": hub_id, "seller_id": "s1", "sku_code": "X1", "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "INVENTORY_NOT_FOUND");

    let (status, _) = server.post("/api/v1/hubs/get", json!({ "id": 999 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_errors_are_400_and_localised() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let res = server
        .client
        .post(server.url("/api/v1/inventory/create"))
        .header("accept-language", "pt-BR")
        .json(&level(0, -1))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Um ou mais campos são inválidos.");
    assert!(body["details"]["hub_id"].is_array());
    assert!(body["details"]["quantity"].is_array());

    // Delta zero
    let (status, _) = server
        .patch(
            "/api/v1/inventory/update-quantity",
            json!({ "hub_id": hub_id, "seller_id": "s1", "sku_code": "X1", "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Corpo que não é JSON válido
    let res = server
        .client
        .post(server.url("/api/v1/inventory/get"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn malformed_json_is_answered_in_the_client_language() {
    let server = TestServer::spawn().await;

    let res = server
        .client
        .post(server.url("/api/v1/inventory/get"))
        .header("content-type", "application/json")
        .header("accept-language", "pt-BR")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_PAYLOAD");
    assert_eq!(body["error"], "O corpo da requisição não é um JSON válido.");
    assert!(body["details"]["reason"].is_string());

    // Sem content-type também é 400 no mesmo formato.
    let res = server
        .client
        .patch(server.url("/api/v1/inventory/update-quantity"))
        .header("accept-language", "pt-BR")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_PAYLOAD");
    assert_eq!(body["error"], "O corpo da requisição não é um JSON válido.");
}

#[tokio::test]
async fn query_with_too_many_codes_is_rejected() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let codes: Vec<String> = (0..101).map(|i| format!("SKU-{i}")).collect();
    let (status, err) = server
        .post(
            "/api/v1/inventory/get",
            json!({ "tenant_id": "t1", "seller_id": "s1", "hub_id": hub_id, "sku_codes": codes }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "TOO_MANY_SKU_CODES");
}

#[tokio::test]
async fn invalid_deadline_header_is_rejected() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let res = server
        .client
        .post(server.url("/api/v1/inventory/get"))
        .header("x-request-timeout-ms", "soon")
        .json(&json!({ "tenant_id": "t1", "seller_id": "s1", "hub_id": hub_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_DEADLINE");

    let res = server
        .client
        .post(server.url("/api/v1/inventory/get"))
        .header("x-request-timeout-ms", "2000")
        .json(&json!({ "tenant_id": "t1", "seller_id": "s1", "hub_id": hub_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn hubs_and_skus_round_trip_through_the_api() {
    let server = TestServer::spawn().await;
    let hub_id = server.seed().await;

    let (status, hub) = server.post("/api/v1/hubs/get", json!({ "id": hub_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hub["name"], "Galpao Norte");
    assert_eq!(hub["location"]["city"], "Recife");

    let res = server.client.get(server.url("/api/v1/hubs/getall")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let all: Value = res.json().await.unwrap();
    assert_eq!(all["count"], 1);

    let (status, skus) = server
        .post(
            "/api/v1/skus/get",
            json!({ "tenant_id": "t1", "seller_id": "s1", "sku_codes": ["X1", "X2"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skus["count"], 1);
    assert_eq!(skus["skus"][0]["sku_code"], "X1");

    let (status, _) = server
        .post(
            "/api/v1/skus/create",
            json!({ "tenant_id": "t1", "seller_id": "s1", "sku_code": "X2", "name": "A" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_http_adjustments_settle_on_the_sum() {
    let server = Arc::new(TestServer::spawn().await);
    let hub_id = server.seed().await;
    server.post("/api/v1/inventory/create", level(hub_id, 10)).await;

    let mut handles = Vec::new();
    for delta in [5, -3, 5, -3, 5, -3] {
        let server = server.clone();
        handles.push(tokio::spawn(async move {
            server
                .patch(
                    "/api/v1/inventory/update-quantity",
                    json!({ "hub_id": hub_id, "seller_id": "s1", "sku_code": "X1", "quantity": delta }),
                )
                .await
                .0
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let (_, list) = server
        .post(
            "/api/v1/inventory/get",
            json!({ "tenant_id": "t1", "seller_id": "s1", "hub_id": hub_id }),
        )
        .await;
    assert_eq!(list["items"][0]["quantity"], 16);
}
