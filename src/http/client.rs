//! Request executor for the explorer API
//!
//! Issues a single HTTP call per request and folds every failure mode into a
//! [`NormalizedResponse`] instead of returning an error to the caller.

#![allow(dead_code)]

use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method, Request, Url,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::ApiConfig;

/// Error text carried by every response that never reached a server
pub const NO_RESPONSE: &str = "No response received";

/// Connection settings handed to the executor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub base_url: String,
    pub default_timeout_ms: u64,
}

impl ExecutorConfig {
    pub fn new(base_url: impl Into<String>, default_timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.into(),
            default_timeout_ms,
        }
    }
}

impl From<&ApiConfig> for ExecutorConfig {
    fn from(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeouts.request_ms)
    }
}

/// Per-call overrides
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub timeout_ms: Option<u64>,
    pub method: Option<String>,
    pub data: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Uniform response record. `status == 0` means no response was received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub status: u16,
    pub data: Value,
    pub headers: HashMap<String, String>,
}

impl NormalizedResponse {
    /// Response for a call that never reached a server
    pub fn no_response() -> Self {
        Self::failed(NO_RESPONSE)
    }

    /// Status-0 response carrying a failure description
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            status: 0,
            data: json!({ "error": description.into() }),
            headers: HashMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn is_no_response(&self) -> bool {
        self.status == 0
    }

    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// The `error` field of the body, when there is one
    pub fn error_message(&self) -> Option<&str> {
        self.data.get("error").and_then(Value::as_str)
    }
}

/// What happened to a single request
#[derive(Clone, Debug, PartialEq)]
pub enum ExchangeOutcome {
    /// The server answered, whatever the status code
    Received {
        status: u16,
        data: Value,
        headers: HashMap<String, String>,
    },
    /// Connection failure, DNS failure or timeout
    NoResponse { reason: String },
    /// The request could not be built from its options
    Rejected { description: String },
}

impl From<ExchangeOutcome> for NormalizedResponse {
    fn from(outcome: ExchangeOutcome) -> Self {
        match outcome {
            ExchangeOutcome::Received {
                status,
                data,
                headers,
            } => NormalizedResponse {
                status,
                data,
                headers,
            },
            ExchangeOutcome::NoResponse { .. } => NormalizedResponse::no_response(),
            ExchangeOutcome::Rejected { description } => NormalizedResponse::failed(description),
        }
    }
}

/// Executes requests against the configured base URL
#[derive(Clone)]
pub struct RequestExecutor {
    client: Client,
    config: ExecutorConfig,
}

impl RequestExecutor {
    /// Create a new executor
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Base URL joined with the endpoint path by exactly one `/`
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Execute a request and normalize the outcome
    pub async fn execute(&self, path: &str, options: &RequestOptions) -> NormalizedResponse {
        self.dispatch(path, options).await.into()
    }

    /// GET with default options
    pub async fn get(&self, path: &str) -> NormalizedResponse {
        self.execute(path, &RequestOptions::default()).await
    }

    /// Issue several requests concurrently, results in submission order
    pub async fn execute_many(
        &self,
        requests: &[(String, RequestOptions)],
    ) -> Vec<NormalizedResponse> {
        join_all(
            requests
                .iter()
                .map(|(path, options)| self.execute(path, options)),
        )
        .await
    }

    /// Execute a request and keep the tagged outcome
    pub async fn dispatch(&self, path: &str, options: &RequestOptions) -> ExchangeOutcome {
        let url = self.build_url(path);

        let request = match self.prepare(&url, options) {
            Ok(request) => request,
            Err(description) => {
                warn!("Request to {} not sent: {}", url, description);
                return ExchangeOutcome::Rejected { description };
            }
        };

        let timeout_ms = options.timeout_ms.unwrap_or(self.config.default_timeout_ms);
        debug!("Sending {} request to {}", request.method(), url);

        let start = Instant::now();
        let outcome =
            match tokio::time::timeout(Duration::from_millis(timeout_ms), self.exchange(request))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => ExchangeOutcome::NoResponse {
                    reason: format!("timed out after {timeout_ms}ms"),
                },
            };

        match &outcome {
            ExchangeOutcome::Received { status, .. } => debug!(
                "Response from {}: {} in {}ms",
                url,
                status,
                start.elapsed().as_millis()
            ),
            ExchangeOutcome::NoResponse { reason } => {
                warn!("No response from {}: {}", url, reason)
            }
            ExchangeOutcome::Rejected { .. } => {}
        }

        outcome
    }

    /// Build the request, reporting malformed options as a description
    fn prepare(&self, url: &str, options: &RequestOptions) -> std::result::Result<Request, String> {
        let method_name = options.method.as_deref().unwrap_or("GET").to_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| format!("Invalid HTTP method: {method_name}"))?;

        let url = Url::parse(url).map_err(|e| format!("Invalid URL {url}: {e}"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in &options.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| format!("Invalid header name: {key}"))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| format!("Invalid value for header {key}"))?;
            headers.insert(name, value);
        }

        let mut builder = self.client.request(method, url).headers(headers);

        if let Some(data) = &options.data {
            let body = serde_json::to_vec(data)
                .map_err(|e| format!("Failed to encode request body: {e}"))?;
            builder = builder.body(body);
        }

        builder.build().map_err(|e| e.to_string())
    }

    async fn exchange(&self, request: Request) -> ExchangeOutcome {
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                return ExchangeOutcome::NoResponse {
                    reason: e.to_string(),
                }
            }
        };

        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_string(), v.to_string());
            }
        }

        let data = match response.text().await {
            Ok(body) => decode_body(&body),
            Err(e) => {
                warn!("Failed to read response body: {}", e);
                Value::Null
            }
        };

        ExchangeOutcome::Received {
            status,
            data,
            headers,
        }
    }
}

/// JSON when the body parses, the raw text otherwise
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Append `key=value` pairs to a path. Values are used as given.
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}
