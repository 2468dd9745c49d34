//! Configuration types for catalog-image-export

use crate::error::{Error, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};

/// Which catalog lookup endpoint identifiers are resolved against
///
/// The two endpoints return the same product document, but the EAN endpoint
/// wraps it one level deeper under `variant`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogEndpoint {
    /// `GET <base>/ean/<id>`
    #[default]
    Ean,
    /// `GET <base>/variants/<id>`
    Variants,
}

impl CatalogEndpoint {
    /// Path segment placed between the base URL and the identifier
    pub fn path_segment(&self) -> &'static str {
        match self {
            CatalogEndpoint::Ean => "ean",
            CatalogEndpoint::Variants => "variants",
        }
    }

    /// Object keys leading from the response root to the `images` array
    pub fn images_path(&self) -> &'static [&'static str] {
        match self {
            CatalogEndpoint::Ean => &["variant", "product", "attributes", "images"],
            CatalogEndpoint::Variants => &["product", "attributes", "images"],
        }
    }
}

impl std::str::FromStr for CatalogEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ean" => Ok(CatalogEndpoint::Ean),
            "variant" | "variants" => Ok(CatalogEndpoint::Variants),
            other => Err(Error::config(
                "catalog.endpoint",
                format!("unknown endpoint '{other}', expected 'ean' or 'variants'"),
            )),
        }
    }
}

/// Remote catalog connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (default: "https://prat.i.footway.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Lookup endpoint (default: ean)
    #[serde(default)]
    pub endpoint: CatalogEndpoint,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every lookup
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: CatalogEndpoint::default(),
            timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Batch processing settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Minimum spacing between two catalog lookups (default: 500ms)
    #[serde(default = "default_request_delay", with = "duration_millis_serde")]
    pub request_delay: Duration,

    /// Upper bound on the number of image columns (None = no cap)
    ///
    /// Identifiers with more images than the cap have the extra URLs dropped.
    #[serde(default)]
    pub max_image_columns: Option<usize>,

    /// Header of the identifier column (default: "id")
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            request_delay: default_request_delay(),
            max_image_columns: None,
            id_column: default_id_column(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Filename announced in the Content-Disposition header of CSV responses
    #[serde(default = "default_download_filename")]
    pub download_filename: String,

    /// Maximum accepted request body size in bytes (default: 10 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            download_filename: default_download_filename(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ApiConfig {
    /// `Content-Disposition` header value announcing `download_filename`
    pub fn content_disposition(&self) -> Result<HeaderValue> {
        let filename = &self.download_filename;
        if filename.trim().is_empty() || filename.contains(['"', '\\']) {
            return Err(Error::config(
                "server.api.download_filename",
                format!("{filename:?} is not a usable download filename"),
            ));
        }

        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")).map_err(|e| {
            Error::config(
                "server.api.download_filename",
                format!("{filename:?} cannot be used in a header: {e}"),
            )
        })
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// Main configuration
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// API server settings
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.catalog.base_url).map_err(|e| {
            Error::config(
                "catalog.base_url",
                format!("'{}' is not a valid URL: {e}", self.catalog.base_url),
            )
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::config(
                "catalog.base_url",
                format!("'{}' cannot be used as a base URL", self.catalog.base_url),
            ));
        }

        if self.catalog.timeout.is_zero() {
            return Err(Error::config(
                "catalog.timeout",
                "timeout must be at least one second",
            ));
        }

        if self.batch.max_image_columns == Some(0) {
            return Err(Error::config(
                "batch.max_image_columns",
                "cap must be positive; omit it to disable the cap",
            ));
        }

        if self.batch.id_column.trim().is_empty() {
            return Err(Error::config("batch.id_column", "id column name is empty"));
        }

        self.server.api.content_disposition()?;

        Ok(())
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://prat.i.footway.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_download_filename() -> String {
    "catalog_images.csv".to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Millisecond Duration serialization helper (pacing intervals are sub-second)
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
