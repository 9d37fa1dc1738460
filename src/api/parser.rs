// src/api/parser.rs
//! Response parsing for the database endpoints.
//!
//! Success bodies go through this crate's serde model; error bodies are
//! decoded with notion-client's error object so the API's own error code
//! reaches the caller.

use super::client::ApiResponse;
use super::types::QueryResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use crate::model::DatabaseSchema;
use notion_client::objects::error::Error as NotionError;
use reqwest::StatusCode;

/// Parse any Notion API response, routing error statuses to error decoding.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success_body(&result.data, &result.url)
    } else {
        Err(parse_error_body(&result.data, result.status, &result.url))
    }
}

fn parse_success_body<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Decodes a Notion error object, falling back to the bare HTTP status.
pub fn parse_error_body(body: &str, status: StatusCode, url: &str) -> AppError {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        log::debug!(
            "Notion error {} ({}) from {}, request id {:?}",
            notion_error.code,
            notion_error.status,
            url,
            notion_error.request_id
        );
        return AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
        };
    }

    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// Parse one page of `databases/{id}/query` results.
pub fn parse_query_response(result: ApiResponse<String>) -> Result<QueryResponse, AppError> {
    parse_api_response(result)
}

/// Parse the `databases/{id}` schema response.
pub fn parse_database_schema(result: ApiResponse<String>) -> Result<DatabaseSchema, AppError> {
    parse_api_response(result)
}
