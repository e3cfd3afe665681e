//! Shared utilities for integration tests.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use f5_mock::config::MockConfig;
use f5_mock::http::{AppState, HttpServer};
use f5_mock::lifecycle::{bootstrap, Shutdown};
use tokio::net::TcpListener;

pub const RSA_CERT: &[u8] = include_bytes!("../fixtures/rsa.crt");
pub const RSA_KEY: &[u8] = include_bytes!("../fixtures/rsa.key");
pub const ECDSA_CERT: &[u8] = include_bytes!("../fixtures/ecdsa.crt");

/// A mock listening on an ephemeral local port.
pub struct TestServer {
    pub url: String,
    pub state: AppState,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the mock with `config`; the listener is bound before this returns.
pub async fn start_mock(config: MockConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = bootstrap(config).unwrap();
    let server = HttpServer::new(state.clone());
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    TestServer {
        url: format!("http://{}", addr),
        state,
        shutdown,
    }
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Client sending the default admin's basic credentials on every request.
pub fn admin_client() -> reqwest::Client {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        basic_auth("admin", "admin").parse().unwrap(),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap()
}

/// Upload `content` as `name` and return its local file path.
pub async fn upload(client: &reqwest::Client, server: &TestServer, name: &str, content: &'static [u8]) -> String {
    let res = client
        .post(server.url(&format!("/mgmt/shared/file-transfer/uploads/{}", name)))
        .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
        .body(content)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    body["localFilePath"].as_str().unwrap().to_string()
}
