//! Application state for the API server

use crate::catalog::{CatalogClient, HttpCatalogClient};
use crate::normalizer::BatchNormalizer;
use crate::{Config, Result};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clones). Only the catalog client is
/// shared between requests; caches and pacers are built per batch.
#[derive(Clone)]
pub struct AppState {
    /// Configuration (read-only while serving)
    pub config: Arc<Config>,

    /// Catalog lookups
    pub catalog: Arc<dyn CatalogClient>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<Config>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { config, catalog }
    }

    /// Validate `config` and create an AppState backed by its HTTP catalog client
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        config.validate()?;
        let catalog = HttpCatalogClient::new(&config.catalog)?;
        Ok(Self::new(config, Arc::new(catalog)))
    }

    /// Build a normalizer for one request, with its own pacer
    pub fn normalizer(&self) -> BatchNormalizer {
        BatchNormalizer::from_config(self.catalog.clone(), &self.config)
    }
}
