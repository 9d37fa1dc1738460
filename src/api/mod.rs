// src/api/mod.rs
//! Notion API interaction: the ability to query a database one page at a time.
//!
//! Business logic depends on the `DatabaseTransport` trait, never on HTTP
//! details, so the query strategies can run against a simulated database.

pub mod client;
pub mod parser;
mod types;

use crate::error::AppError;
use crate::model::DatabaseSchema;
use crate::types::DatabaseId;

/// The ability to read a Notion database.
///
/// Implementations perform exactly one request per call. A request that
/// runs out of time must fail with `AppError::RequestTimeout` so that the
/// caller can tell it apart from failures that will not go away on retry.
#[async_trait::async_trait]
pub trait DatabaseTransport: Send + Sync {
    /// Fetches one page of rows matching `options`.
    async fn query_database(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<QueryResponse, AppError>;

    /// Fetches the database's property schema.
    async fn retrieve_database(&self, database: &DatabaseId) -> Result<DatabaseSchema, AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use types::{
    CreatedTimeFilter, DateCondition, PaginatedResponse, QueryFilter, QueryOptions, QueryResponse,
    SortDirection, TimestampProperty, TimestampSort,
};
