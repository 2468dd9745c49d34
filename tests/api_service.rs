//! REST API over the HTTP catalog client, backed by a mock catalog

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_image_export::api::{AppState, create_router};
use common::*;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn test_json_batch_end_to_end() {
    let server = reference_catalog().await;
    let state = AppState::from_config(Arc::new(test_config(&server.uri()))).unwrap();
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/process-eans-text")
        .header("content-type", "application/json")
        .body(Body::from(r#"["A", "B"]"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(std::str::from_utf8(&body).unwrap(), REFERENCE_CSV);
}

#[tokio::test]
async fn test_catalog_outage_still_answers_csv() {
    let server = wiremock::MockServer::start().await;
    mount_ean_status(&server, "A", 503).await;
    let state = AppState::from_config(Arc::new(test_config(&server.uri()))).unwrap();
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/process-eans-text")
        .header("content-type", "application/json")
        .body(Body::from(r#"["A"]"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(std::str::from_utf8(&body).unwrap(), "id\nA\n");
}

#[tokio::test]
async fn test_invalid_base_url_is_config_error() {
    let config = test_config("not a url");

    let result = AppState::from_config(Arc::new(config));

    assert!(matches!(
        result,
        Err(catalog_image_export::Error::Config { .. })
    ));
}

#[tokio::test]
async fn test_unusable_download_filename_fails_at_startup() {
    let mut config = test_config("http://127.0.0.1:9");
    config.server.api.download_filename = "bad\nname.csv".to_string();

    let result = AppState::from_config(Arc::new(config));

    assert!(matches!(
        result,
        Err(catalog_image_export::Error::Config { key: Some(ref k), .. }) if k == "server.api.download_filename"
    ));
}
