//! Bulk wire format encoding and response types.
//!
//! The engine's `_bulk` endpoint consumes newline-delimited JSON: one
//! action-metadata line followed by one body line per record, and the stream
//! must end with a trailing newline or the engine rejects it as unparseable.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};

/// Stateless encoder producing the `_bulk` wire format.
///
/// No batching policy lives here; [`BatchBuffer`](crate::BatchBuffer) decides
/// when to encode and send. A record is only appended if both its action line
/// and body line serialize, so a failed append leaves the stream unchanged.
#[derive(Debug, Default)]
pub struct BulkEncoder {
    buf: Vec<u8>,
    records: usize,
}

impl BulkEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record targeting `index` / `doc_type`.
    pub fn append<T: Serialize>(&mut self, index: &str, doc_type: &str, body: &T) -> Result<()> {
        let action = serde_json::to_vec(&json!({
            "index": { "_index": index, "_type": doc_type }
        }))
        .map_err(Error::Encoding)?;
        let doc = serde_json::to_vec(body).map_err(Error::Encoding)?;

        self.buf.extend_from_slice(&action);
        self.buf.push(b'\n');
        self.buf.extend_from_slice(&doc);
        self.buf.push(b'\n');
        self.records += 1;

        Ok(())
    }

    /// Number of records appended so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Check whether any records have been appended.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Consume the encoder and return the encoded stream.
    pub fn finish(self) -> Bytes {
        Bytes::from(self.buf)
    }
}

/// Response from the `_bulk` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Time taken in milliseconds.
    #[serde(default)]
    pub took: f64,
    /// Whether any item failed.
    #[serde(default)]
    pub errors: bool,
    /// Per-record results, in request order.
    #[serde(default)]
    pub items: Vec<BulkResponseItem>,
}

/// One `_bulk` item result, keyed by operation type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkResponseItem {
    /// Create result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<BulkItemStatus>,
    /// Delete result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<BulkItemStatus>,
    /// Update result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<BulkItemStatus>,
    /// Index result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<BulkItemStatus>,
}

/// Status of a single bulk operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkItemStatus {
    /// Index name.
    #[serde(rename = "_index", default)]
    pub index: String,
    /// Document type.
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    /// Document ID.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Document version.
    #[serde(rename = "_version", default)]
    pub version: i64,
    /// HTTP status code for this item.
    #[serde(default)]
    pub status: u16,
    /// Error description, if the item failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkItemStatus {
    /// Check if the operation succeeded.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;

    #[derive(Serialize)]
    struct Pet {
        name: &'static str,
        species: &'static str,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no structured representation"))
        }
    }

    #[test]
    fn test_encode_pairs_in_insertion_order() {
        let pets = [
            Pet { name: "Tobi", species: "ferret" },
            Pet { name: "Loki", species: "ferret" },
            Pet { name: "Manny", species: "cat" },
        ];

        let mut encoder = BulkEncoder::new();
        for pet in &pets {
            encoder.append("pets", "pet", pet).unwrap();
        }
        assert_eq!(encoder.records(), 3);

        let stream = encoder.finish();
        let text = std::str::from_utf8(&stream).unwrap();
        assert!(text.ends_with('\n'));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        for (i, pet) in pets.iter().enumerate() {
            assert_eq!(
                lines[i * 2],
                r#"{"index":{"_index":"pets","_type":"pet"}}"#
            );
            assert!(lines[i * 2 + 1].contains(pet.name));
        }
    }

    #[test]
    fn test_empty_encoder() {
        let encoder = BulkEncoder::new();
        assert!(encoder.is_empty());
        assert!(encoder.finish().is_empty());
    }

    #[test]
    fn test_failed_append_leaves_stream_unchanged() {
        let mut encoder = BulkEncoder::new();
        encoder.append("pets", "pet", &Pet { name: "Tobi", species: "ferret" }).unwrap();

        let err = encoder.append("pets", "pet", &Unserializable).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));

        assert_eq!(encoder.records(), 1);
        let text = encoder.finish();
        let lines = std::str::from_utf8(&text).unwrap().lines().count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_bulk_response_decode() {
        let raw = r#"{
            "took": 3.0,
            "errors": true,
            "items": [
                { "index": { "_index": "pets", "_type": "pet", "_id": "1", "_version": 1, "status": 201 } },
                { "index": { "_index": "pets", "_type": "pet", "_id": "2", "status": 400, "error": "mapper_parsing_exception" } }
            ]
        }"#;

        let response: BulkResponse = serde_json::from_str(raw).unwrap();
        assert!(response.errors);
        assert_eq!(response.items.len(), 2);

        let first = response.items[0].index.as_ref().unwrap();
        assert!(first.is_success());
        let second = response.items[1].index.as_ref().unwrap();
        assert!(!second.is_success());
        assert_eq!(second.error.as_deref(), Some("mapper_parsing_exception"));
    }
}
