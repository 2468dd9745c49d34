use super::*;
use crate::Config;
use crate::catalog::CatalogClient;
use crate::error::ApiError;
use crate::types::{CatalogRecord, Identifier};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

mod system;

const BOUNDARY: &str = "catalog-test-boundary";

/// Catalog answering from memory; unknown identifiers are absent
struct StaticCatalog {
    products: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl StaticCatalog {
    fn new(products: &[(&str, &[&str])]) -> Self {
        Self {
            products: products
                .iter()
                .map(|(id, urls)| (id.to_string(), urls.iter().map(|u| u.to_string()).collect()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn fetch(&self, identifier: &Identifier) -> CatalogRecord {
        self.calls.lock().unwrap().push(identifier.to_string());
        match self.products.get(identifier.as_str()) {
            Some(urls) => {
                let images: Vec<_> = urls.iter().map(|u| json!({ "url": u })).collect();
                CatalogRecord::Present(json!({
                    "variant": { "product": { "attributes": { "images": images } } }
                }))
            }
            None => CatalogRecord::Absent,
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Config with pacing disabled so tests don't sleep between lookups
fn test_config() -> Config {
    let mut config = Config::default();
    config.batch.request_delay = Duration::ZERO;
    config
}

/// Router over the reference catalog: A has two images, B has one
fn create_test_app() -> (Router, Arc<StaticCatalog>) {
    create_test_app_with(test_config())
}

fn create_test_app_with(config: Config) -> (Router, Arc<StaticCatalog>) {
    let catalog = Arc::new(StaticCatalog::new(&[
        ("A", &["u1", "u2"]),
        ("B", &["u3"]),
    ]));
    let state = AppState::new(Arc::new(config), catalog.clone());
    (create_router(state), catalog)
}

fn multipart_request(field: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"eans.txt\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/process-eans")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process-eans-text")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_error(response: Response) -> ApiError {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let mut config = test_config();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let state = AppState::new(Arc::new(config), Arc::new(StaticCatalog::new(&[])));

    let api_handle = tokio::spawn(async move { start_api_server(state).await });

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!api_handle.is_finished(), "server should still be running");
    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let (app, _catalog) = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS headers should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = test_config();
    config.server.api.cors_enabled = false;
    let (app, _catalog) = create_test_app_with(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS headers should be absent when CORS is disabled"
    );
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let mut config = test_config();
    config.server.api.swagger_ui = false;
    let (app, _catalog) = create_test_app_with(config);

    let request = Request::builder()
        .uri("/swagger-ui/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
