//! Client for the document-search engine's HTTP API.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::Method;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::{
    batch::BatchBuffer,
    bulk::BulkResponse,
    catalog::{DateLayout, IndexCatalog},
    config::ClientConfig,
    error::{Error, Result},
    retire::RetirementPlanner,
    transport::{HttpTransport, Transport},
};

/// Engine client. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!(url = %config.url, "initializing client");

        let transport = HttpTransport::new(config)?;

        Ok(Self {
            transport: Arc::new(transport),
        })
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a batch buffer writing to `index` / `doc_type`.
    pub fn batch<T: Serialize>(
        &self,
        index: impl Into<String>,
        doc_type: impl Into<String>,
    ) -> BatchBuffer<T> {
        BatchBuffer::new(self.clone(), index, doc_type)
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// POST a pre-encoded bulk stream, discarding the response body.
    pub async fn bulk(&self, body: Bytes) -> Result<()> {
        self.request_raw(Method::POST, "/_bulk", Some(body)).await?;
        Ok(())
    }

    /// POST a pre-encoded bulk stream and decode the per-item results.
    pub async fn bulk_with_response(&self, body: Bytes) -> Result<BulkResponse> {
        self.request(Method::POST, "/_bulk", Some(body)).await
    }

    /// Delete `index`. Accepts a comma-joined list for a batch delete.
    pub async fn delete_index(&self, index: &str) -> Result<()> {
        info!(index, "deleting index");

        self.request_raw(Method::DELETE, &format!("/{}", index), None)
            .await?;
        Ok(())
    }

    /// Delete all indices.
    pub async fn delete_all(&self) -> Result<()> {
        info!("deleting all indices");

        self.request_raw(Method::DELETE, "/_all", None).await?;
        Ok(())
    }

    /// Refresh `index` to make recent writes searchable.
    pub async fn refresh_index(&self, index: &str) -> Result<()> {
        debug!(index, "refreshing index");

        self.request_raw(Method::POST, &format!("/{}/_refresh", index), None)
            .await?;
        Ok(())
    }

    /// Refresh all indices.
    pub async fn refresh_all(&self) -> Result<()> {
        debug!("refreshing all indices");

        self.request_raw(Method::POST, "/_refresh", None).await?;
        Ok(())
    }

    // =========================================================================
    // Search Operations
    // =========================================================================

    /// Query `index` with a serializable query and decode the result.
    pub async fn search_index<Q, R>(&self, index: &str, query: &Q) -> Result<R>
    where
        Q: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(query).map_err(Error::Encoding)?;
        self.request(
            Method::POST,
            &format!("/{}/_search", index),
            Some(Bytes::from(body)),
        )
        .await
    }

    /// Query `index` with a raw query string and decode the result.
    pub async fn search_index_raw<R: DeserializeOwned>(&self, index: &str, query: &str) -> Result<R> {
        self.request(
            Method::POST,
            &format!("/{}/_search", index),
            Some(Bytes::from(query.to_string())),
        )
        .await
    }

    // =========================================================================
    // Index Lifecycle
    // =========================================================================

    /// Fetch the current index/alias listing as a point-in-time catalog.
    pub async fn aliases(&self) -> Result<IndexCatalog> {
        self.request(Method::GET, "/_aliases", None).await
    }

    /// Remove `alias` from time-partitioned indices older than
    /// `retention_days` relative to `reference`.
    ///
    /// No request is issued when nothing matches. To keep the past week of
    /// `logs-%y-%m-%d` indices aliased you might run this daily with a
    /// retention of 8.
    pub async fn remove_old_aliases(
        &self,
        layout: &DateLayout,
        alias: &str,
        retention_days: i64,
        reference: DateTime<Utc>,
    ) -> Result<()> {
        let catalog = self
            .aliases()
            .await?
            .matching_older_than(layout, retention_days, reference);

        let plan = RetirementPlanner::plan_alias_removal(&catalog, alias);
        match plan.to_body() {
            Some(body) => {
                info!(alias, removals = plan.removals().len(), "removing aged aliases");
                self.request_raw(Method::POST, "/_aliases", Some(body)).await?;
            }
            None => debug!(alias, "no aged aliases to remove"),
        }

        Ok(())
    }

    /// Delete time-partitioned indices older than `retention_days` relative
    /// to `reference`, as one comma-joined batch delete.
    pub async fn remove_old_indexes(
        &self,
        layout: &DateLayout,
        retention_days: i64,
        reference: DateTime<Utc>,
    ) -> Result<()> {
        let catalog = self.aliases().await?;
        if catalog.is_empty() {
            return Ok(());
        }

        let names = RetirementPlanner::plan_index_deletion(
            &catalog.matching_older_than(layout, retention_days, reference),
        );
        if names.is_empty() {
            debug!("no aged indices to delete");
            return Ok(());
        }

        self.delete_index(&names.join(",")).await
    }

    // =========================================================================
    // Transport Plumbing
    // =========================================================================

    /// Execute a request, surfacing any >= 300 status as [`Error::Response`].
    async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<Bytes> {
        let response = self.transport.execute(method, path, body).await?;
        Ok(response.error_for_status()?.body)
    }

    /// Execute a request and decode the response body.
    async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> Result<R> {
        let raw = self.request_raw(method, path, body).await?;
        serde_json::from_slice(&raw).map_err(Error::Decode)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
