//! Test configuration helpers

use catalog_image_export::{CatalogEndpoint, Config};
use std::time::Duration;

/// Config pointing at a mock catalog, with pacing disabled and a short timeout
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = base_url.to_string();
    config.catalog.timeout = Duration::from_secs(2);
    config.batch.request_delay = Duration::ZERO;
    config
}

/// Same as [`test_config`], resolving identifiers against the variants endpoint
pub fn variants_config(base_url: &str) -> Config {
    let mut config = test_config(base_url);
    config.catalog.endpoint = CatalogEndpoint::Variants;
    config
}
