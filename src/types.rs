//! Core types for catalog-image-export

use serde::{Deserialize, Serialize};

/// Product identifier (EAN or variant ID) keying one catalog lookup
///
/// Always trimmed and non-empty; construct through [`Identifier::parse`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Trim `raw` and wrap it, or return None when nothing is left
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::parse(&value).ok_or_else(|| "identifier must not be blank".to_string())
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw catalog response for one identifier
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogRecord {
    /// Parsed JSON body of a successful lookup
    Present(serde_json::Value),
    /// The lookup failed or returned nothing usable
    Absent,
}

impl CatalogRecord {
    /// Whether the lookup failed
    pub fn is_absent(&self) -> bool {
        matches!(self, CatalogRecord::Absent)
    }

    /// The JSON document, if the lookup succeeded
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            CatalogRecord::Present(value) => Some(value),
            CatalogRecord::Absent => None,
        }
    }
}

/// One output line: the identifier and exactly `width` image slots
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    /// Identifier this row was produced for
    pub id: Identifier,
    /// Image URLs, right-padded with empty strings to the batch width
    pub images: Vec<String>,
}

/// Counters collected while normalizing a batch
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Number of identifiers in the batch, duplicates included
    pub identifiers: usize,
    /// Number of catalog lookups actually issued
    pub fetched: usize,
    /// Identifiers answered from the cache (repeated identifiers)
    pub cache_hits: usize,
    /// Lookups that came back absent
    pub absent: usize,
    /// Largest image count seen before any cap was applied
    pub max_images_found: usize,
    /// Rows that lost URLs to the column cap
    pub truncated_rows: usize,
}

/// Result of a normalization run
#[derive(Clone, Debug)]
pub struct NormalizedBatch {
    /// One row per input identifier, in input order
    pub rows: Vec<OutputRow>,
    /// Number of image columns every row carries
    pub width: usize,
    /// Run counters
    pub stats: BatchStats,
}
