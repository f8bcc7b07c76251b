//! Client for Elasticsearch-compatible document-search engines.
//!
//! This crate provides a small, explicit client for the engine's HTTP API
//! with support for:
//! - Bulk writes through a buffered batch writer
//! - Time-partitioned index lifecycle (age out by alias rotation or deletion)
//! - Simple single-shot search calls
//! - Basic auth and (optionally) AWS SigV4 request signing
//!
//! # Example
//!
//! ```rust,no_run
//! use serde::Serialize;
//! use tidemark::{Client, ClientConfig, DateLayout};
//!
//! #[derive(Serialize)]
//! struct Check {
//!     name: String,
//!     healthy: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::new("http://localhost:9200"))?;
//!
//!     // Buffer writes, flush as one bulk request.
//!     let mut batch = client.batch("checks-16-04-09", "check");
//!     batch.add(Check { name: "api".into(), healthy: true }).await?;
//!     batch.add(Check { name: "db".into(), healthy: true }).await?;
//!     batch.flush().await?;
//!
//!     // Retire indices older than a week from the rolling alias.
//!     let layout = DateLayout::new("checks-%y-%m-%d");
//!     client
//!         .remove_old_aliases(&layout, "checks", 8, chrono::Utc::now())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod batch;
mod bulk;
mod catalog;
mod client;
mod config;
mod error;
mod retire;
mod transport;

pub use batch::BatchBuffer;
pub use bulk::{BulkEncoder, BulkItemStatus, BulkResponse, BulkResponseItem};
pub use catalog::{DateLayout, IndexCatalog, IndexEntry};
pub use client::Client;
pub use config::{AuthStrategy, ClientConfig};
pub use error::{Error, Result};
pub use retire::{AliasRemoval, RetirementPlan, RetirementPlanner};
pub use transport::{HttpTransport, Transport, TransportResponse};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        BatchBuffer, Client, ClientConfig, DateLayout, Error, IndexCatalog, Result,
        RetirementPlanner,
    };
}
