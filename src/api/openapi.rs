//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the catalog image export
//! REST API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the catalog image export REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "catalog-image-export REST API",
        version = "0.1.0",
        description = "Exports product image URLs from the catalog service as a CSV document, one row per submitted identifier",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Batches
        crate::api::routes::process_eans_upload,
        crate::api::routes::process_eans_text,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "batches", description = "Batch export - Submit identifiers and download the image URL CSV"),
        (name = "system", description = "System endpoints - Health check and OpenAPI spec"),
    )
)]
pub struct ApiDoc;
