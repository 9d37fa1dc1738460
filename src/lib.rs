// src/lib.rs
//! notion2records library: complete, deduplicated snapshots of Notion
//! databases, flattened into display-ready records.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `SnapshotConfig`
//! - **Querying**: `DatabaseQuerier` and the partitioning utilities
//! - **Transport**: `DatabaseTransport`, `NotionHttpClient`, query vocabulary
//! - **Formatting**: `NotionFormatter`, `FormattedPage`
//! - **Pipeline**: `SnapshotCollector`, `Strategy`

mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
mod formatting;
mod model;
mod pipeline;
mod query;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::error_recovery::retry_on_timeout;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, SnapshotConfig, API_SECRET_ENV};

// --- Querying ---
pub use crate::query::{
    decreasing_size_partition_between, intervals_from_boundaries, partition_between,
    DatabaseQuerier, PageAccumulator, PartitionOptions,
};

// --- Transport ---
pub use crate::api::{
    client::ApiResponse,
    parser::{parse_database_schema, parse_query_response},
    CreatedTimeFilter, DatabaseTransport, DateCondition, NotionHttpClient, PaginatedResponse,
    QueryFilter, QueryOptions, QueryResponse, SortDirection, TimestampProperty, TimestampSort,
};

// --- Domain Model ---
pub use crate::model::{
    DatabaseSchema, DateValue, FileReference, FileUrl, FormulaResult, NotionDate, Page,
    PartialUser, PropertyConfig, PropertyTypeValue, PropertyValue, RelationReference,
    RelationSchema, RichTextItem, RollupResult, SchemaProperty, SelectOption, UniqueIdData,
    VerificationData,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, DatabaseId, Id, PageId, PropertyName};

// --- Formatting ---
pub use crate::formatting::{
    format_property_value, DatabaseSnapshot, Databases, FormattedPage, FormattedProperty,
    FormattedValue, Link, NotionFormatter, RelationResolver,
};

// --- Pipeline ---
pub use crate::pipeline::{SnapshotCollector, SnapshotSource, Strategy};
