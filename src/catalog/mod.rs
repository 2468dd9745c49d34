//! Remote catalog lookups
//!
//! The core abstraction is the [`CatalogClient`] trait: one lookup per
//! identifier, answering with a [`CatalogRecord`]. Lookups never fail from the
//! caller's point of view; a failed lookup is logged and answered with
//! [`CatalogRecord::Absent`].
//!
//! - [`HttpCatalogClient`]: reqwest-backed client for the catalog HTTP API
//!
//! ## Usage
//!
//! ```no_run
//! use catalog_image_export::catalog::{CatalogClient, HttpCatalogClient};
//! use catalog_image_export::config::CatalogConfig;
//! use catalog_image_export::types::Identifier;
//!
//! # async fn example() -> catalog_image_export::Result<()> {
//! let client = HttpCatalogClient::new(&CatalogConfig::default())?;
//! let id = Identifier::parse("7350056808765").expect("non-empty");
//! let record = client.fetch(&id).await;
//! println!("absent: {}", record.is_absent());
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::HttpCatalogClient;

use crate::types::{CatalogRecord, Identifier};
use async_trait::async_trait;

/// Source of catalog records
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Look up one identifier
    ///
    /// Issues at most one outbound request. Callers are responsible for pacing
    /// successive calls.
    async fn fetch(&self, identifier: &Identifier) -> CatalogRecord;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
