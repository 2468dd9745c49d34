//! HTTP catalog client

use super::CatalogClient;
use crate::config::{CatalogConfig, CatalogEndpoint};
use crate::error::{Error, FetchError, Result};
use crate::types::{CatalogRecord, Identifier};
use async_trait::async_trait;
use url::Url;

/// Catalog client issuing `GET <base>/<endpoint>/<identifier>` requests
///
/// The underlying `reqwest::Client` is connection-pooled and holds no
/// per-batch state, so one instance can serve concurrent batches.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
    endpoint: CatalogEndpoint,
}

impl HttpCatalogClient {
    /// Build a client from catalog settings
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::config(
                "catalog.base_url",
                format!("'{}' is not a valid URL: {e}", config.base_url),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(
                "catalog.base_url",
                format!("'{}' cannot be used as a base URL", config.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url,
            endpoint: config.endpoint,
        })
    }

    /// Lookup URL for an identifier; the identifier becomes one encoded path segment
    pub fn record_url(&self, identifier: &Identifier) -> std::result::Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(self.endpoint.path_segment())
            .push(identifier.as_str());
        Ok(url)
    }

    async fn try_fetch(
        &self,
        identifier: &Identifier,
    ) -> std::result::Result<serde_json::Value, FetchError> {
        let url = self.record_url(identifier)?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch(&self, identifier: &Identifier) -> CatalogRecord {
        match self.try_fetch(identifier).await {
            Ok(value) => CatalogRecord::Present(value),
            Err(e) => {
                tracing::warn!(
                    identifier = %identifier,
                    endpoint = self.endpoint.path_segment(),
                    error = %e,
                    "Catalog lookup failed, treating record as absent"
                );
                CatalogRecord::Absent
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
