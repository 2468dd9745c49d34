use super::*;

#[tokio::test]
async fn test_health_check() {
    let (app, _catalog) = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_openapi_spec_endpoint() {
    let (app, _catalog) = create_test_app();

    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(json["paths"].get("/process-eans").is_some());
    assert!(json["paths"].get("/process-eans-text").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _catalog) = create_test_app();

    let request = Request::builder()
        .uri("/downloads")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
