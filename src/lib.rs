//! # catalog-image-export
//!
//! Fetches product image URLs from a remote catalog for a batch of product
//! identifiers (EANs or variant ids) and exports them as a CSV document with
//! one row per identifier and a fixed number of image columns.
//!
//! ## Pipeline
//!
//! A batch runs in two phases:
//! 1. **Discover** - each distinct identifier is looked up once (paced by a
//!    [`pacing::Pacer`]), its image list extracted, and the widest list
//!    determines the column count.
//! 2. **Emit** - one row per input identifier (duplicates included, input
//!    order kept), padded or truncated to the column count.
//!
//! Lookups that fail are logged and produce a row with no images; the batch
//! still succeeds. Only an empty batch is rejected.
//!
//! ## Quick Start
//!
//! ```no_run
//! use catalog_image_export::{Config, export_file};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let batch = export_file(&config, Path::new("eans.txt"), None, Path::new("images.csv")).await?;
//!     println!("{} rows, {} image columns", batch.rows.len(), batch.width);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Remote catalog lookups
pub mod catalog;
/// Configuration types
pub mod config;
/// CSV output
pub mod csv_output;
/// Error types
pub mod error;
/// Image URL extraction from catalog records
pub mod extract;
/// Identifier ingestion
pub mod input;
/// Two-phase batch normalization
pub mod normalizer;
/// Request pacing
pub mod pacing;
/// Core types
pub mod types;

use std::path::Path;
use std::sync::Arc;

// Re-export commonly used types
pub use catalog::{CatalogClient, HttpCatalogClient};
pub use config::{CatalogEndpoint, Config};
pub use error::{ApiError, ErrorDetail, Error, FetchError, Result, ToHttpStatus};
pub use normalizer::{BatchNormalizer, Discovery};
pub use pacing::{FixedIntervalPacer, NoDelayPacer, Pacer};
pub use types::{BatchStats, CatalogRecord, Identifier, NormalizedBatch, OutputRow};

/// Export the image URLs for every identifier in `input` to a CSV file.
///
/// With `column` unset, `input` is newline-delimited text and the output has
/// the configured id column followed by the image columns. With `column` set,
/// `input` is a CSV document: every input row and column is written back out
/// with the image columns appended.
///
/// The CSV is built in memory before `output` is written, so a failed run
/// leaves no partial file behind.
pub async fn export_file(
    config: &Config,
    input: &Path,
    column: Option<&str>,
    output: &Path,
) -> Result<NormalizedBatch> {
    let catalog: Arc<dyn CatalogClient> = Arc::new(HttpCatalogClient::new(&config.catalog)?);
    let normalizer = BatchNormalizer::from_config(catalog, config);

    let (batch, csv) = match column {
        Some(column) => {
            let table = input::read_csv_table(input, column).await?;
            let batch = normalizer.normalize(&table.identifiers()).await?;
            let csv = csv_output::to_enriched_csv_bytes(&table, &batch)?;
            (batch, csv)
        }
        None => {
            let identifiers = input::read_identifier_file(input).await?;
            let batch = normalizer.normalize(&identifiers).await?;
            let csv = batch.to_csv(&config.batch.id_column)?;
            (batch, csv)
        }
    };

    tokio::fs::write(output, &csv).await?;

    tracing::info!(
        output = %output.display(),
        rows = batch.rows.len(),
        width = batch.width,
        absent = batch.stats.absent,
        truncated_rows = batch.stats.truncated_rows,
        "CSV written"
    );

    Ok(batch)
}

/// Wait for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Wait for a termination signal (Ctrl+C).
#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
