// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Only one of them is ever retried: a transient request timeout. Every
//! other failure travels unchanged to the top-level caller.

use std::fmt;
use thiserror::Error;

/// The `code` field of a Notion error body.
///
/// Codes this crate reacts to get their own variant; any other code is kept
/// verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// `object_not_found`: the database is missing or not shared with the integration.
    ObjectNotFound,
    /// `unauthorized`: the integration secret was rejected.
    Unauthorized,
    RateLimited,
    /// `validation_error`, typically a filter the API refused.
    ValidationFailed,
    /// Error body was not a Notion error object.
    HttpStatus(u16),
    Unknown(String),
}

impl NotionErrorCode {
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "rate_limited" => Self::RateLimited,
            "validation_error" => Self::ValidationFailed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectNotFound => f.write_str("object_not_found"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::RateLimited => f.write_str("rate_limited"),
            Self::ValidationFailed => f.write_str("validation_error"),
            Self::HttpStatus(status) => write!(f, "http_{}", status),
            Self::Unknown(code) => f.write_str(code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request to {endpoint} timed out")]
    RequestTimeout { endpoint: String },

    #[error("Fetch failed after {attempts} attempts: {source}")]
    FetchFailed {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Database {0} is not part of the snapshot")]
    UnknownDatabase(String),

    #[error("Relation target database not found for property {property_id}")]
    MissingRelationTarget { property_id: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether this failure is a transient request timeout worth repeating.
    ///
    /// Authorization, not-found and malformed-query failures are never
    /// transient: repeating them cannot change the outcome.
    pub fn is_transient_timeout(&self) -> bool {
        match self {
            AppError::RequestTimeout { .. } => true,
            AppError::NetworkFailure(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}
