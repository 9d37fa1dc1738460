// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how a database snapshot is retrieved: how much each request asks for,
//! how often a timed-out request is repeated, how a time span is carved up.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many pages the Notion API returns per database query.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips during full pagination.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Page size of the two probes that locate the oldest and newest record.
pub const PROBE_PAGE_SIZE: u32 = 1;

/// The Notion API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Seconds before a single request is abandoned as timed out.
///
/// Matches the default of the official JavaScript client.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

/// How many times a timed-out page request is repeated before giving up.
///
/// Three retries means four attempts in total. There is no delay between
/// attempts; a timeout already spent the request's whole time budget.
pub const MAX_TIMEOUT_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// Time partitioning
// ---------------------------------------------------------------------------

/// Number of interior split points when partitioning a database's time span.
pub const DEFAULT_PARTITION_COUNT: i32 = 10;

/// Upper bound on interior split points; each interval costs at least one request.
pub const MAX_PARTITION_COUNT: u32 = 1000;

/// Exponent of the power-law warp applied to partition boundaries.
///
/// 2 makes intervals near the newest end roughly a third the width of those
/// near the oldest end for the default partition count.
pub const DEFAULT_DECREASE_RATIO: f64 = 2.0;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
