//! HTTP client implementation.
//!
//! Callers get a uniform retry-or-fail signal: the upstream status and error
//! text are logged here and never surfaced, except for JSON-RPC `error`
//! members whose message is preserved.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use bns_core::constants::{DEFAULT_TIMEOUT_SECONDS, JSON_RPC_VERSION};
use bns_core::error::{BnsError, Result};
use bns_core::Status;

/// HTTP client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Skip TLS certificate verification (local nodes with self-signed certs)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: Some(concat!("bns-deploy/", env!("CARGO_PKG_VERSION")).into()),
            accept_invalid_certs: false,
        }
    }
}

impl HttpConfig {
    /// Sets the timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Disables TLS certificate verification.
    pub fn insecure(mut self) -> Self {
        self.accept_invalid_certs = true;
        self
    }
}

/// Stateless HTTP client. Cheap to clone and safe to share across tasks.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http_client: reqwest::Client,
}

impl HttpClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let http_client = builder
            .build()
            .map_err(|e| BnsError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Issues a GET. Query parameters and headers are attached only when non-empty.
    #[instrument(skip(self, query, headers))]
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Status<Value> {
        let mut request = self.http_client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = with_headers(request, headers);

        self.do_request(Method::GET, url, request).await
    }

    /// Issues a POST with a JSON body. The body is attached only when it is
    /// neither `null` nor an empty object.
    #[instrument(skip(self, body, headers))]
    pub async fn post(&self, url: &str, body: &Value, headers: &[(&str, &str)]) -> Status<Value> {
        let mut request = self.http_client.post(url);
        if !is_empty_body(body) {
            request = request.json(body);
        }
        request = with_headers(request, headers);

        self.do_request(Method::POST, url, request).await
    }

    /// GET whose payload is normalised through a JSON round-trip.
    ///
    /// Errors and null/empty payloads pass through untouched. Bodies are
    /// already decoded by `get`, so a JSON string stays a string.
    #[instrument(skip(self, query, headers))]
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Status<Value> {
        let status = self.get(url, query, headers).await;
        if status.is_error() {
            return status;
        }

        let has_payload = matches!(status.data(), Some(data) if !is_empty_payload(data));
        if !has_payload {
            return status;
        }

        let data = status.into_data().unwrap_or(Value::Null);
        match round_trip(&data) {
            Ok(json) => Status::success("", json),
            Err(e) => {
                warn!(url, error = %e, "getJSON round-trip failed");
                Status::system_busy()
            }
        }
    }

    /// Performs a JSON-RPC 2.0 call.
    ///
    /// An RPC-level `error` yields an error status carrying the upstream
    /// message; otherwise the `result` member is returned.
    #[instrument(skip(self, params))]
    pub async fn json_rpc(&self, url: &str, method: &str, params: Value) -> Status<Value> {
        let envelope = json_rpc_envelope(method, params);
        let request = self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&envelope);

        let status = self.do_request(Method::POST, url, request).await;
        if status.is_error() {
            return status;
        }

        let body = status.into_data().unwrap_or(Value::Null);

        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            warn!(url, method, error = %error, "JSON-RPC error");
            return Status::error(message, None);
        }

        let result = body.get("result").cloned().unwrap_or(Value::Null);
        Status::success("", result)
    }

    /// Sends a prepared request and converts the outcome into a status.
    async fn do_request(&self, method: Method, url: &str, request: RequestBuilder) -> Status<Value> {
        match send(&method, url, request).await {
            Ok(body) => {
                debug!(%method, url, "HTTP request succeeded");
                Status::success("", body)
            }
            Err(e) => {
                let upstream = match &e {
                    BnsError::HttpStatus { status, .. } => Some(*status),
                    _ => None,
                };
                warn!(%method, url, status = ?upstream, error = %e, "HTTP request error");
                Status::system_busy()
            }
        }
    }
}

async fn send(method: &Method, url: &str, request: RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| BnsError::HttpError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BnsError::HttpStatus {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| BnsError::HttpError(e.to_string()))?;

    Ok(parse_body(&text))
}

/// Builds a JSON-RPC 2.0 envelope whose id is the current epoch in ms.
pub fn json_rpc_envelope(method: &str, params: Value) -> Value {
    serde_json::json!({
        "jsonrpc": JSON_RPC_VERSION,
        "id": chrono::Utc::now().timestamp_millis(),
        "method": method,
        "params": params,
    })
}

fn with_headers(mut request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

/// JSON bodies are decoded; anything else is kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn round_trip(data: &Value) -> Result<Value> {
    let serialized = serde_json::to_string(data)?;
    Ok(serde_json::from_str(&serialized)?)
}
