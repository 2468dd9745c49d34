//! Mock catalog fixtures

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// EAN endpoint document carrying the given image URLs
pub fn ean_document(urls: &[&str]) -> Value {
    json!({ "variant": variants_document(urls) })
}

/// Variants endpoint document carrying the given image URLs
pub fn variants_document(urls: &[&str]) -> Value {
    let images: Vec<Value> = urls.iter().map(|u| json!({ "url": u })).collect();
    json!({ "product": { "attributes": { "images": images } } })
}

/// Serve `body` at `GET /ean/<id>`, expecting exactly `calls` requests
pub async fn mount_ean(server: &MockServer, id: &str, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/ean/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Answer `GET /ean/<id>` with an error status
pub async fn mount_ean_status(server: &MockServer, id: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/ean/{id}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mock catalog with the reference products: A has images u1, u2; B has u3
pub async fn reference_catalog() -> MockServer {
    let server = MockServer::start().await;
    mount_ean(&server, "A", ean_document(&["u1", "u2"]), 1).await;
    mount_ean(&server, "B", ean_document(&["u3"]), 1).await;
    server
}

/// Expected CSV for the reference products requested as A then B
pub const REFERENCE_CSV: &str = "id,image_url_1,image_url_2\nA,u1,u2\nB,u3,\n";
