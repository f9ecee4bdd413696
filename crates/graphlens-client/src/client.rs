//! Transport client for the `/query` endpoint.
//!
//! One textual query in, one tabular result out. No implicit retries:
//! queries may be expensive or long-running, so retry policy belongs to
//! the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed failures from query execution.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected query ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("query timed out")]
    Timeout,
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Configuration for connecting to the query endpoint.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Request body sent to the `/query` endpoint.
#[derive(Debug, Clone, Serialize)]
struct QueryRequest {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Map<String, Value>>,
}

/// Tabular result: ordered rows, each a mapping from column name to a value
/// that may be a scalar, a node-shaped object, or a relationship-shaped
/// object.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub columns: Vec<String>,
    pub data: Vec<Map<String, Value>>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Thin HTTP client for the query endpoint. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with the given configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        tracing::debug!(base_url = %config.base_url, "query endpoint client ready");
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Execute one textual query.
    pub async fn execute(&self, query: &str) -> Result<QueryResponse, ApiError> {
        self.execute_with_params(query, None).await
    }

    /// Execute a query with bound parameters.
    pub async fn execute_with_params(
        &self,
        query: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<QueryResponse, ApiError> {
        let url = format!("{}/query", self.base_url);
        let request = QueryRequest {
            query: query.to_string(),
            params,
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(ApiError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let result: QueryResponse = response.json().await?;
        tracing::debug!(
            rows = result.data.len(),
            elapsed_ms = result.execution_time_ms,
            "query executed"
        );
        Ok(result)
    }
}
