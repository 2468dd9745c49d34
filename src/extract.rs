//! Image URL extraction from catalog records
//!
//! The catalog nests the image list several objects deep. Anything that does
//! not match the expected shape yields an empty (or partial) list instead of an
//! error.

use crate::config::CatalogEndpoint;
use crate::types::CatalogRecord;
use serde_json::Value;

/// Pulls the ordered image URL list out of a [`CatalogRecord`]
#[derive(Clone, Copy, Debug)]
pub struct ImageExtractor {
    endpoint: CatalogEndpoint,
}

impl ImageExtractor {
    /// Create an extractor for records returned by `endpoint`
    pub fn new(endpoint: CatalogEndpoint) -> Self {
        Self { endpoint }
    }

    /// Extract image URLs in source order
    ///
    /// Entries that are not objects, lack a `url` key, or carry a non-string
    /// `url` are skipped.
    pub fn extract(&self, record: &CatalogRecord) -> Vec<String> {
        let Some(root) = record.as_json() else {
            return Vec::new();
        };

        let Some(images) = self.images_node(root) else {
            return Vec::new();
        };

        let Some(entries) = images.as_array() else {
            tracing::warn!(
                found = json_kind(images),
                "images field is not a list, treating as empty"
            );
            return Vec::new();
        };

        let mut urls = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match entry.get("url") {
                Some(Value::String(url)) => urls.push(url.clone()),
                Some(other) => {
                    tracing::warn!(index, found = json_kind(other), "skipping non-string image url");
                }
                None => {
                    tracing::warn!(index, "skipping image entry without url");
                }
            }
        }
        urls
    }

    fn images_node<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.endpoint
            .images_path()
            .iter()
            .try_fold(root, |node, key| node.as_object()?.get(*key))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ean_record(images: Value) -> CatalogRecord {
        CatalogRecord::Present(json!({
            "variant": { "product": { "attributes": { "images": images } } }
        }))
    }

    #[test]
    fn extracts_urls_in_order() {
        let record = ean_record(json!([
            { "url": "https://img/2.jpg", "position": 2 },
            { "url": "https://img/1.jpg" },
            { "url": "https://img/2.jpg" }
        ]));

        let urls = ImageExtractor::new(CatalogEndpoint::Ean).extract(&record);
        assert_eq!(
            urls,
            vec!["https://img/2.jpg", "https://img/1.jpg", "https://img/2.jpg"]
        );
    }

    #[test]
    fn variants_endpoint_is_one_level_shallower() {
        let record = CatalogRecord::Present(json!({
            "product": { "attributes": { "images": [ { "url": "u1" } ] } }
        }));

        assert_eq!(
            ImageExtractor::new(CatalogEndpoint::Variants).extract(&record),
            vec!["u1"]
        );
        // The same document read with the EAN schema has no `variant` key
        assert!(ImageExtractor::new(CatalogEndpoint::Ean).extract(&record).is_empty());
    }

    #[test]
    fn absent_record_is_empty() {
        assert!(
            ImageExtractor::new(CatalogEndpoint::Ean)
                .extract(&CatalogRecord::Absent)
                .is_empty()
        );
    }

    #[test]
    fn each_missing_level_is_empty() {
        let extractor = ImageExtractor::new(CatalogEndpoint::Ean);
        let documents = [
            json!({}),
            json!({ "variant": {} }),
            json!({ "variant": { "product": {} } }),
            json!({ "variant": { "product": { "attributes": {} } } }),
        ];

        for doc in documents {
            let record = CatalogRecord::Present(doc.clone());
            assert!(extractor.extract(&record).is_empty(), "expected empty for {doc}");
        }
    }

    #[test]
    fn non_object_intermediate_is_empty() {
        let extractor = ImageExtractor::new(CatalogEndpoint::Ean);
        for doc in [
            json!([1, 2, 3]),
            json!({ "variant": "gone" }),
            json!({ "variant": { "product": null } }),
            json!({ "variant": { "product": { "attributes": [] } } }),
        ] {
            assert!(extractor.extract(&CatalogRecord::Present(doc)).is_empty());
        }
    }

    #[test]
    fn non_list_images_is_empty() {
        let extractor = ImageExtractor::new(CatalogEndpoint::Ean);
        assert!(extractor.extract(&ean_record(json!("u1"))).is_empty());
        assert!(extractor.extract(&ean_record(json!({ "url": "u1" }))).is_empty());
        assert!(extractor.extract(&ean_record(Value::Null)).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let record = ean_record(json!([
            { "url": "u1" },
            { "alt": "no url here" },
            "just a string",
            { "url": 42 },
            { "url": null },
            { "url": "u2" }
        ]));

        assert_eq!(
            ImageExtractor::new(CatalogEndpoint::Ean).extract(&record),
            vec!["u1", "u2"]
        );
    }
}
