//! REST API server module
//!
//! Exposes batch export over HTTP: submit identifiers as an uploaded text file
//! or as a JSON array and receive the CSV document as a file attachment.

use crate::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Batches
/// - `POST /process-eans` - Identifiers from a multipart file upload (field `file`)
/// - `POST /process-eans-text` - Identifiers from a JSON array body
///
/// Both batch routes also answer with a trailing slash (`/process-eans/`).
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Batches (also reachable with a trailing slash)
        .route("/process-eans", post(routes::process_eans_upload))
        .route("/process-eans/", post(routes::process_eans_upload))
        .route("/process-eans-text", post(routes::process_eans_text))
        .route("/process-eans-text/", post(routes::process_eans_text))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // SwaggerUi serves its own copy of the OpenAPI document under /api-docs
    let router = if config.server.api.swagger_ui {
        router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
    } else {
        router
    };

    let router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.api.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        router.layer(build_cors_layer(&config.server.api.cors_origins))
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` or an empty list allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until SIGINT/SIGTERM (Ctrl+C elsewhere), then stops accepting
/// connections and lets in-flight batches finish.
///
/// # Example
///
/// ```no_run
/// use catalog_image_export::Config;
/// use catalog_image_export::api::AppState;
/// use std::sync::Arc;
///
/// # async fn example() -> catalog_image_export::Result<()> {
/// let state = AppState::from_config(Arc::new(Config::default()))?;
/// catalog_image_export::api::start_api_server(state).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(state: AppState) -> Result<()> {
    let bind_address = state.config.server.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(state);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::wait_for_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
