// src/query/mod.rs
//! Complete retrieval of a Notion database through its paged query API.
//!
//! Every strategy is built on one retrying page fetch:
//!
//! - `fetch_all_pages` follows the continuation cursor from the start.
//! - `fetch_all_pages_by_partition` splits the creation-time span into
//!   sub-ranges and paginates all of them at once.
//! - `fetch_bidirectionally` walks from both ends until the two fronts meet.
//!
//! Concurrency is cooperative: sub-fetches are futures joined on the calling
//! task, so the first failure aborts the whole call and no partial result
//! is ever returned.

mod bidirectional;
mod pagination;
mod partition;
mod partitioned;

pub use pagination::PageAccumulator;
pub use partition::{
    decreasing_size_partition_between, intervals_from_boundaries, partition_between,
    PartitionOptions,
};

use crate::api::{DatabaseTransport, QueryOptions, QueryResponse};
use crate::constants::MAX_TIMEOUT_RETRIES;
use crate::error::AppError;
use crate::error_recovery::retry_on_timeout;
use crate::model::PropertyConfig;
use crate::types::DatabaseId;
use std::sync::Arc;

/// Reads whole databases through a [`DatabaseTransport`].
#[derive(Clone)]
pub struct DatabaseQuerier {
    transport: Arc<dyn DatabaseTransport>,
    max_timeout_retries: u32,
}

impl DatabaseQuerier {
    pub fn new(transport: Arc<dyn DatabaseTransport>) -> Self {
        Self {
            transport,
            max_timeout_retries: MAX_TIMEOUT_RETRIES,
        }
    }

    /// Overrides how many times a timed-out request is repeated.
    pub fn with_timeout_retries(self, max_timeout_retries: u32) -> Self {
        Self {
            max_timeout_retries,
            ..self
        }
    }

    /// Sends one query and returns the page exactly as the transport did.
    ///
    /// Timeouts are retried without delay; after the last attempt the
    /// timeout surfaces as `AppError::FetchFailed`. Other failures are
    /// returned on first occurrence.
    pub async fn fetch_page(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<QueryResponse, AppError> {
        log::debug!(
            "Querying database {} (page size {}, cursor {:?})",
            database,
            options.page_size,
            options.start_cursor
        );
        let what = format!("Query of database {}", database);
        let response = retry_on_timeout(
            move || self.transport.query_database(database, options),
            self.max_timeout_retries,
            &what,
        )
        .await?;
        log::debug!(
            "Database {} returned {} rows (has_more: {})",
            database,
            response.results.len(),
            response.has_more
        );
        Ok(response)
    }

    /// Retrieves the database schema as one config per property, in schema order.
    pub async fn fetch_property_configs(
        &self,
        database: &DatabaseId,
    ) -> Result<Vec<PropertyConfig>, AppError> {
        let what = format!("Schema retrieval of database {}", database);
        let schema = retry_on_timeout(
            move || self.transport.retrieve_database(database),
            self.max_timeout_retries,
            &what,
        )
        .await?;
        Ok(schema.property_configs())
    }
}
