use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use hookrelay::config::Config;
use hookrelay::store::MemoryEndpointStore;

/// A running test server backed by a fresh in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Create an endpoint, return the `data` payload of the envelope.
    pub async fn create_endpoint(&self, name: Option<&str>, destination: &str) -> Value {
        let mut body = json!({ "destination": destination });
        if let Some(name) = name {
            body["name"] = json!(name);
        }
        let (body, status) = self.post("/api/v1/endpoints.new", &body).await;
        assert_eq!(status, StatusCode::OK, "create endpoint failed: {body}");
        body["data"].clone()
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .json(body)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post a raw body to the forward route; the response is returned untouched.
    pub async fn send(&self, path: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/v1/endpoints.send/{path}")))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("send request failed")
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        db_max_connections: 1,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_body_size: 64 * 1024,
        forward_timeout: Duration::from_secs(5),
        log_level: "warn".to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryEndpointStore::new());
    let (app, _state) =
        hookrelay::build_app(store, test_config()).expect("Failed to build app");

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}
