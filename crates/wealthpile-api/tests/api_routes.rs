//! End-to-end tests of the wealth service over real sockets.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use wealthpile_api::{
    ApiConfig, CacheHandle, KvStore, MemoryStore, UpstreamSettings, WealthServer, BILLIONAIRES_KEY,
    CACHE_TTL,
};

async fn spawn_upstream(body: Value) -> String {
    let app = Router::new().route(
        "/person",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/person", addr)
}

struct TestServer {
    base: String,
    store: Arc<MemoryStore>,
    client: reqwest::Client,
}

async fn start(secret: Option<&str>, upstream_body: Option<Value>) -> TestServer {
    let upstream = match upstream_body {
        Some(body) => Some(UpstreamSettings {
            url: spawn_upstream(body).await,
            api_key: None,
            api_host: None,
        }),
        None => None,
    };
    let config = ApiConfig {
        cron_secret: secret.map(str::to_string),
        upstream,
        ..ApiConfig::default()
    };

    let store = Arc::new(MemoryStore::new());
    let cache = CacheHandle::with_store(store.clone(), CACHE_TTL);
    let server = WealthServer::with_cache(config, cache).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener, std::future::pending()));

    TestServer {
        base: format!("http://{}", addr),
        store,
        client: reqwest::Client::new(),
    }
}

impl TestServer {
    async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn health_is_ok() {
    let server = start(None, None).await;
    let body = reqwest::get(format!("{}/health", server.base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn wealth_falls_back_on_empty_cache() {
    let server = start(None, None).await;
    let (status, body) = server.get_json("/api/wealth").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["data"]["elonMusk"]["id"], "elon-musk");
    assert!(body["data"]["elonMusk"]["netWorth"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn refresh_requires_secret() {
    let server = start(Some("s3cret"), Some(json!({ "netWorth": 400 }))).await;
    let (status, body) = server.get_json("/api/cron/update-wealth").await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "Unauthorized");
    assert!(server.store.is_empty().await);
}

#[tokio::test]
async fn refresh_writes_through_to_cache() {
    let server = start(
        Some("s3cret"),
        Some(json!({ "personName": "Elon Musk", "finalWorth": 412_300, "rank": 1 })),
    )
    .await;

    let response = server
        .client
        .post(format!("{}/api/cron/update-wealth", server.base))
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["netWorth"].as_f64(), Some(412.3e9));
    assert_eq!(body["data"]["rank"], 1);

    assert!(server.store.get(BILLIONAIRES_KEY).await.unwrap().is_some());
    assert!(server.store.get("wealth:elon-musk").await.unwrap().is_some());

    let (status, wealth) = server.get_json("/api/wealth").await;
    assert_eq!(status, 200);
    assert_eq!(wealth["source"], "cache");
    assert_eq!(wealth["data"]["elonMusk"]["netWorth"].as_f64(), Some(412.3e9));
}

#[tokio::test]
async fn scheduler_header_authorizes() {
    let server = start(Some("s3cret"), Some(json!({ "netWorth": 401 }))).await;
    let response = server
        .client
        .get(format!("{}/api/cron/update-wealth", server.base))
        .header("x-vercel-cron", "1")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn open_refresh_without_secret() {
    let server = start(None, Some(json!([{ "name": "Elon Musk", "worth": "$399B" }]))).await;
    let (status, body) = server.get_json("/api/cron/update-wealth").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["netWorth"].as_f64(), Some(399e9));
}

#[tokio::test]
async fn unparseable_upstream_reports_fields() {
    let server = start(None, Some(json!({ "name": "Elon Musk", "fortune": 1 }))).await;
    let (status, body) = server.get_json("/api/cron/update-wealth").await;

    assert_eq!(status, 500);
    let fields: Vec<_> = body["debug"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(fields.contains(&"fortune"));
    assert!(server.store.is_empty().await);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let config = ApiConfig {
        upstream: Some(UpstreamSettings {
            url: "http://127.0.0.1:9/person".to_string(),
            api_key: None,
            api_host: None,
        }),
        ..ApiConfig::default()
    };
    let cache = CacheHandle::with_store(Arc::new(MemoryStore::new()), CACHE_TTL);
    let server = WealthServer::with_cache(config, cache).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server.serve(listener, std::future::pending()));

    let response = reqwest::get(format!("http://{}/api/cron/update-wealth", addr))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);
}
