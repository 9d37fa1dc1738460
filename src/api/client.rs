// src/api/client.rs
//! HTTP client wrapper for the Notion database endpoints.
//!
//! Handles authentication, the API version header and the request timeout.
//! Parsing lives in `parser`; paging and retrying live in `query`.

use super::parser;
use super::types::{QueryOptions, QueryResponse};
use super::DatabaseTransport;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::DatabaseSchema;
use crate::types::{ApiKey, DatabaseId};
use reqwest::{header, Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey, request_timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: NOTION_API_BASE_URL.to_string(),
        })
    }

    /// Points the client at another API root, e.g. a local stub server.
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..self
        }
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint (path without base URL).
    pub async fn get(&self, endpoint: &str) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_send_error(e, endpoint))?;
        reject_gateway_timeout(response, endpoint)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "   Query body: {}",
                serde_json::to_string(body).unwrap_or_else(|_| "Failed to serialize".to_string())
            );
        }

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_send_error(e, endpoint))?;
        reject_gateway_timeout(response, endpoint)
    }
}

/// A request that ran out of time becomes the retryable timeout kind; every
/// other transport failure stays a network failure.
fn classify_send_error(error: reqwest::Error, endpoint: &str) -> AppError {
    if error.is_timeout() {
        AppError::RequestTimeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        AppError::NetworkFailure(error)
    }
}

/// Notion answers 504 when its own backend gives up on a slow query.
fn reject_gateway_timeout(response: Response, endpoint: &str) -> Result<Response, AppError> {
    if response.status() == StatusCode::GATEWAY_TIMEOUT {
        return Err(AppError::RequestTimeout {
            endpoint: endpoint.to_string(),
        });
    }
    Ok(response)
}

#[async_trait::async_trait]
impl DatabaseTransport for NotionHttpClient {
    async fn query_database(
        &self,
        database: &DatabaseId,
        options: &QueryOptions,
    ) -> Result<QueryResponse, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        let response = self.post(&endpoint, options).await?;
        let result = extract_response_text(response).await?;
        parser::parse_query_response(result)
    }

    async fn retrieve_database(&self, database: &DatabaseId) -> Result<DatabaseSchema, AppError> {
        let endpoint = format!("databases/{}", database.to_dashed());
        let response = self.get(&endpoint).await?;
        let result = extract_response_text(response).await?;
        parser::parse_database_schema(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
}

/// Extracts the response body as text with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await.map_err(|e| {
        if e.is_timeout() {
            AppError::RequestTimeout { endpoint: url.clone() }
        } else {
            AppError::NetworkFailure(e)
        }
    })?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
