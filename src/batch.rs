//! Buffered batch writer.
//!
//! [`BatchBuffer`] accumulates records for one (index, type) target and sends
//! them in a single `_bulk` request. `add` is pure and fast; `flush` is the
//! only I/O boundary. A successful flush drains the buffer atomically; a
//! failed flush leaves it untouched so the caller can retry without losing
//! records. The buffer itself never retries.
//!
//! Memory is bounded only by the process: callers streaming unbounded input
//! should set a flush threshold or flush at their own cadence. A buffer is
//! not safe for concurrent mutation; shard one buffer per writer instead of
//! locking a shared instance.

use serde::Serialize;
use tracing::debug;

use crate::{
    bulk::{BulkEncoder, BulkResponse},
    client::Client,
    error::Result,
};

/// Buffered writer for one (index, type) target.
#[derive(Debug)]
pub struct BatchBuffer<T> {
    client: Client,
    index: String,
    doc_type: String,
    threshold: usize,
    pending: Vec<T>,
}

impl<T: Serialize> BatchBuffer<T> {
    /// Create an empty buffer writing to `index` / `doc_type`.
    pub fn new(client: Client, index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
            doc_type: doc_type.into(),
            threshold: 0,
            pending: Vec::new(),
        }
    }

    /// Auto-flush from `add` once this many records are pending. `0`
    /// disables auto-flush (the default).
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Target index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Target type name.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Number of pending records.
    pub fn size(&self) -> usize {
        self.pending.len()
    }

    /// Check whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Append a record to the pending batch.
    ///
    /// Performs no I/O unless the configured threshold is reached, in which
    /// case the buffer flushes itself and any flush failure is surfaced here
    /// rather than dropped.
    pub async fn add(&mut self, record: T) -> Result<Option<BulkResponse>> {
        self.pending.push(record);

        if self.threshold > 0 && self.pending.len() >= self.threshold {
            return self.flush().await;
        }

        Ok(None)
    }

    /// Send all pending records in one bulk request.
    ///
    /// Returns `Ok(None)` without touching the network when nothing is
    /// pending. The batch is encoded in full before anything is sent, so an
    /// encoding failure performs no partial write; on any failure the pending
    /// records are kept for a caller-driven retry.
    pub async fn flush(&mut self) -> Result<Option<BulkResponse>> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let mut encoder = BulkEncoder::new();
        for record in &self.pending {
            encoder.append(&self.index, &self.doc_type, record)?;
        }

        debug!(index = %self.index, records = encoder.records(), "flushing batch");

        let response = self.client.bulk_with_response(encoder.finish()).await?;
        self.pending.clear();

        Ok(Some(response))
    }
}
