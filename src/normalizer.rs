//! Two-phase batch normalization
//!
//! The number of image columns is only known once every record has been seen,
//! so a batch runs in two phases:
//!
//! 1. **Discovery** ([`BatchNormalizer::discover`]): fetch every identifier in
//!    input order, cache the record, and fold its image count into the batch
//!    width. Every identifier is visited; stopping early would under-count the
//!    width.
//! 2. **Emission** ([`BatchNormalizer::emit`]): walk the identifiers again, read
//!    records from the cache (never re-fetching), and build rows with exactly
//!    `width` image slots.
//!
//! Per-identifier failures only ever produce empty rows. The one whole-run
//! failure is [`Error::EmptyBatch`], raised before anything is fetched.

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::ImageExtractor;
use crate::pacing::{Pacer, pacer_for};
use crate::types::{BatchStats, CatalogRecord, Identifier, NormalizedBatch, OutputRow};
use std::collections::HashMap;
use std::sync::Arc;

/// Output of the discovery phase: the record cache and the batch width
#[derive(Debug, Default)]
pub struct Discovery {
    cache: HashMap<Identifier, CatalogRecord>,
    /// Number of image columns every emitted row carries
    pub width: usize,
    /// Counters gathered so far
    pub stats: BatchStats,
}

impl Discovery {
    /// Cached record for an identifier
    pub fn record(&self, identifier: &Identifier) -> Option<&CatalogRecord> {
        self.cache.get(identifier)
    }

    /// Number of distinct identifiers held in the cache
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Runs batches of identifiers through the fetch → extract → pad pipeline
///
/// Each call to [`normalize`](Self::normalize) works on its own cache. The
/// pacer is shared by every call on this instance, so a service should build
/// one normalizer per request unless it wants a global limit.
pub struct BatchNormalizer {
    client: Arc<dyn CatalogClient>,
    pacer: Arc<dyn Pacer>,
    extractor: ImageExtractor,
    max_image_columns: Option<usize>,
}

impl BatchNormalizer {
    /// Create a normalizer with no column cap
    pub fn new(
        client: Arc<dyn CatalogClient>,
        pacer: Arc<dyn Pacer>,
        extractor: ImageExtractor,
    ) -> Self {
        Self {
            client,
            pacer,
            extractor,
            max_image_columns: None,
        }
    }

    /// Create a normalizer paced, capped and keyed as `config` describes
    ///
    /// A fresh pacer is built on every call.
    pub fn from_config(client: Arc<dyn CatalogClient>, config: &Config) -> Self {
        Self::new(
            client,
            pacer_for(config.batch.request_delay),
            ImageExtractor::new(config.catalog.endpoint),
        )
        .with_max_image_columns(config.batch.max_image_columns)
    }

    /// Cap the number of image columns; longer image lists are truncated
    #[must_use]
    pub fn with_max_image_columns(mut self, cap: Option<usize>) -> Self {
        self.max_image_columns = cap;
        self
    }

    /// Run both phases over `identifiers`
    ///
    /// Returns one row per identifier, duplicates included, in input order.
    pub async fn normalize(&self, identifiers: &[Identifier]) -> Result<NormalizedBatch> {
        let discovery = self.discover(identifiers).await?;
        Ok(self.emit(identifiers, discovery))
    }

    /// Discovery phase: fetch and cache every record and determine the width
    pub async fn discover(&self, identifiers: &[Identifier]) -> Result<Discovery> {
        if identifiers.is_empty() {
            return Err(Error::EmptyBatch);
        }

        tracing::info!(
            identifiers = identifiers.len(),
            client = self.client.name(),
            pacer = self.pacer.name(),
            "Discovering image counts"
        );

        let mut discovery = Discovery {
            stats: BatchStats {
                identifiers: identifiers.len(),
                ..BatchStats::default()
            },
            ..Discovery::default()
        };
        let mut observed = 0usize;

        for identifier in identifiers {
            if !discovery.cache.contains_key(identifier) {
                self.pacer.wait().await;
                let record = self.client.fetch(identifier).await;
                discovery.stats.fetched += 1;
                if record.is_absent() {
                    discovery.stats.absent += 1;
                }
                discovery.cache.insert(identifier.clone(), record);
            } else {
                discovery.stats.cache_hits += 1;
            }

            let count = discovery
                .record(identifier)
                .map(|record| self.extractor.extract(record).len())
                .unwrap_or(0);
            tracing::debug!(identifier = %identifier, images = count, "Counted images");
            observed = observed.max(count);
        }

        discovery.stats.max_images_found = observed;
        discovery.width = match self.max_image_columns {
            Some(cap) => observed.min(cap),
            None => observed,
        };

        tracing::info!(
            max_images_found = observed,
            width = discovery.width,
            fetched = discovery.stats.fetched,
            absent = discovery.stats.absent,
            "Discovery complete"
        );

        Ok(discovery)
    }

    /// Emission phase: build padded rows from the discovery cache
    pub fn emit(&self, identifiers: &[Identifier], discovery: Discovery) -> NormalizedBatch {
        let width = discovery.width;
        let mut stats = discovery.stats.clone();

        let rows = identifiers
            .iter()
            .map(|identifier| {
                let mut images = discovery
                    .record(identifier)
                    .map(|record| self.extractor.extract(record))
                    .unwrap_or_default();

                if images.len() > width {
                    tracing::warn!(
                        identifier = %identifier,
                        images = images.len(),
                        width,
                        "Dropping image URLs beyond the column cap"
                    );
                    stats.truncated_rows += 1;
                    images.truncate(width);
                }
                images.resize(width, String::new());

                OutputRow {
                    id: identifier.clone(),
                    images,
                }
            })
            .collect();

        NormalizedBatch { rows, width, stats }
    }
}
