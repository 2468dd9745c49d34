//! Batch export handlers.

use super::IMAGE_COLUMNS_HEADER;
use crate::api::AppState;
use crate::error::{ApiError, Error, Result};
use crate::input::{identifiers_from_json, identifiers_from_upload};
use crate::types::Identifier;
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// POST /process-eans - Export image URLs for identifiers in an uploaded file
#[utoipa::path(
    post,
    path = "/process-eans",
    tag = "batches",
    request_body(content = Vec<u8>, description = "Text file with one identifier per line (multipart/form-data, field `file`)", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "CSV document with one row per identifier", content_type = "text/csv", body = String),
        (status = 400, description = "Missing or unreadable file, or no identifiers in it", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn process_eans_upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<Bytes> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => upload = Some(bytes),
                    Err(e) => {
                        return rejected(Error::InvalidInput(format!(
                            "failed to read uploaded file: {e}"
                        )));
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return rejected(Error::InvalidInput(format!(
                    "malformed multipart body: {e}"
                )));
            }
        }
    }

    let Some(bytes) = upload else {
        return (StatusCode::BAD_REQUEST, Json(ApiError::missing_file("file"))).into_response();
    };

    match identifiers_from_upload(&bytes) {
        Ok(identifiers) => export(&state, &identifiers).await,
        Err(e) => rejected(e),
    }
}

/// POST /process-eans-text - Export image URLs for a JSON array of identifiers
#[utoipa::path(
    post,
    path = "/process-eans-text",
    tag = "batches",
    request_body(content = Vec<String>, description = "JSON array of identifiers, e.g. [\"7350056808765\", \"7350056806419\"]", content_type = "application/json"),
    responses(
        (status = 200, description = "CSV document with one row per identifier", content_type = "text/csv", body = String),
        (status = 400, description = "Body is not a JSON array of strings, or holds no identifiers", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn process_eans_text(State(state): State<AppState>, body: Bytes) -> Response {
    match identifiers_from_json(&body) {
        Ok(identifiers) => export(&state, &identifiers).await,
        Err(e) => rejected(e),
    }
}

/// Run a batch and answer with the CSV attachment or the error
async fn export(state: &AppState, identifiers: &[Identifier]) -> Response {
    match build_csv_response(state, identifiers).await {
        Ok(response) => response,
        Err(e) => rejected(e),
    }
}

async fn build_csv_response(state: &AppState, identifiers: &[Identifier]) -> Result<Response> {
    // Before any lookup: a bad download filename is a server error
    let disposition = state
        .config
        .server
        .api
        .content_disposition()
        .map_err(|e| Error::ApiServerError(e.to_string()))?;

    let batch = state.normalizer().normalize(identifiers).await?;
    let csv = batch.to_csv(&state.config.batch.id_column)?;

    tracing::info!(
        identifiers = batch.stats.identifiers,
        width = batch.width,
        absent = batch.stats.absent,
        bytes = csv.len(),
        "Batch exported"
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
            (
                HeaderName::from_static(IMAGE_COLUMNS_HEADER),
                HeaderValue::from(batch.width),
            ),
        ],
        csv,
    )
        .into_response())
}

fn rejected(error: Error) -> Response {
    if error.is_client_error() {
        tracing::warn!(error = %error, "Batch rejected");
    } else {
        tracing::error!(error = %error, "Batch export failed");
    }
    error.into_response()
}
