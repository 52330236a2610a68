//! IPFS client implementation.
//!
//! Every public operation returns a [`Status`]; any internal failure is
//! logged and reported as `SYSTEM_BUSY`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use bns_core::constants::{
    DEFAULT_IPFS_API_URL, DEFAULT_IPFS_GATEWAY, DEFAULT_TIMEOUT_SECONDS, IPFS_URI_SCHEME,
    UNPIN_SUCCESSFUL,
};
use bns_core::error::{BnsError, Result};
use bns_core::utils::path_exists;
use bns_core::Status;
use bns_http::{HttpClient, HttpConfig};

/// IPFS client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpfsConfig {
    /// Node RPC API base URL (e.g. "http://127.0.0.1:5001")
    pub api_url: String,
    /// Gateway used to build content URLs (e.g. "https://ipfs.io/ipfs")
    pub gateway_endpoint: String,
    /// Pin added content
    #[serde(default = "default_pin")]
    pub pin: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Authorization header value for hosted node APIs (e.g. "Basic ...")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,
}

fn default_pin() -> bool {
    true
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_IPFS_API_URL.into(),
            gateway_endpoint: DEFAULT_IPFS_GATEWAY.into(),
            pin: true,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            auth_header: None,
        }
    }
}

impl IpfsConfig {
    /// Creates a config for a node API and gateway.
    pub fn new(api_url: impl Into<String>, gateway_endpoint: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            gateway_endpoint: gateway_endpoint.into(),
            ..Default::default()
        }
    }

    /// Adds an Authorization header for the node API.
    pub fn with_auth(mut self, header: impl Into<String>) -> Self {
        self.auth_header = Some(header.into());
        self
    }

    /// Sets whether added content is pinned.
    pub fn with_pin(mut self, pin: bool) -> Self {
        self.pin = pin;
        self
    }

    /// Checks that both endpoints are absolute URLs.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("apiUrl", &self.api_url), ("gatewayEndpoint", &self.gateway_endpoint)] {
            url::Url::parse(value).map_err(|e| {
                BnsError::ConfigError(format!("ipfsConfig.{} '{}' is not a URL: {}", field, value, e))
            })?;
        }
        Ok(())
    }
}

/// Content id and gateway URL of added content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedContent {
    /// Content id
    pub cid: String,
    /// Gateway URL
    pub url: String,
}

/// IPFS client for add/fetch/unpin operations.
pub struct IpfsClient {
    config: IpfsConfig,
    http_client: reqwest::Client,
    gateway: HttpClient,
}

impl IpfsClient {
    /// Creates a new IPFS client with the given config.
    pub fn with_config(config: IpfsConfig) -> Result<Self> {
        let gateway = HttpClient::with_config(
            HttpConfig::default().with_timeout(config.timeout_seconds),
        )?;
        Self::with_http(config, gateway)
    }

    /// Creates a client that fetches through an existing HTTP client.
    pub fn with_http(config: IpfsConfig, gateway: HttpClient) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BnsError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            gateway,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IpfsConfig {
        &self.config
    }

    /// Gateway URL for a content id.
    pub fn file_url(&self, cid: &str) -> String {
        format!(
            "{}/{}",
            self.config.gateway_endpoint.trim_end_matches('/'),
            strip_ipfs_scheme(cid)
        )
    }

    /// Reads a file and adds it. `filename` defaults to the path's base name.
    #[instrument(skip(self, path))]
    pub async fn add_file_by_path(
        &self,
        path: impl AsRef<Path>,
        filename: Option<&str>,
    ) -> Status<AddedContent> {
        let path = path.as_ref();

        if !path_exists(path).await {
            warn!(path = %path.display(), "File not found for reading");
            return Status::system_busy();
        }

        match self.try_add_file(path, filename).await {
            Ok(added) => Status::success("", added),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "IPFS addFileByPath failed");
                Status::system_busy()
            }
        }
    }

    /// Adds in-memory text. Without a filename the content is named `<uuid>.txt`.
    #[instrument(skip(self, text))]
    pub async fn add_text_content(&self, text: &str, filename: Option<&str>) -> Status<AddedContent> {
        let name = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.txt", uuid::Uuid::new_v4()));

        match self.add_bytes(text.as_bytes().to_vec(), name).await {
            Ok(added) => Status::success("", added),
            Err(e) => {
                warn!(error = %e, "IPFS addTextContent failed");
                Status::system_busy()
            }
        }
    }

    /// Fetches content through the gateway. Accepts bare or `ipfs://` ids.
    #[instrument(skip(self))]
    pub async fn fetch(&self, cid: &str) -> Status<Value> {
        let cid = strip_ipfs_scheme(cid);
        if cid.trim().is_empty() {
            warn!("IPFS fetch called with an empty CID");
            return Status::system_busy();
        }

        let url = self.file_url(cid);
        let status = self.gateway.get(&url, &[], &[]).await;
        if status.is_error() {
            return status;
        }

        debug!(cid, "Fetched from gateway");
        Status::success("", status.into_data())
    }

    /// Removes the pin for a content id. The content itself may persist until
    /// the node garbage-collects it.
    #[instrument(skip(self))]
    pub async fn unpin(&self, cid: &str) -> Status<()> {
        let cid = strip_ipfs_scheme(cid);

        match self.try_unpin(cid).await {
            Ok(()) => Status::success(UNPIN_SUCCESSFUL, None),
            Err(e) => {
                warn!(cid, error = %e, "IPFS unpin failed");
                Status::system_busy()
            }
        }
    }

    async fn try_add_file(&self, path: &Path, filename: Option<&str>) -> Result<AddedContent> {
        let data = tokio::fs::read(path).await?;

        let name = match filename {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| BnsError::ValidationError(format!("{} has no file name", path.display())))?,
        };

        self.add_bytes(data, name).await
    }

    async fn add_bytes(&self, data: Vec<u8>, name: String) -> Result<AddedContent> {
        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| BnsError::IpfsAddFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new().part("file", file_part);

        let pin = if self.config.pin { "true" } else { "false" };
        let request = self
            .http_client
            .post(self.api_endpoint("add"))
            .query(&[("pin", pin)])
            .multipart(form);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BnsError::IpfsAddFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BnsError::IpfsAddFailed(format!(
                "add failed with status {}: {}",
                status, text
            )));
        }

        let json: AddResponse = response
            .json()
            .await
            .map_err(|e| BnsError::IpfsAddFailed(e.to_string()))?;

        debug!(cid = %json.hash, name, "Added to IPFS");
        Ok(AddedContent {
            url: self.file_url(&json.hash),
            cid: json.hash,
        })
    }

    async fn try_unpin(&self, cid: &str) -> Result<()> {
        let request = self
            .http_client
            .post(self.api_endpoint("pin/rm"))
            .query(&[("arg", cid)]);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BnsError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BnsError::IpfsUnpinFailed {
                cid: cid.to_string(),
                reason: format!("HTTP {}: {}", status, text),
            });
        }

        debug!(cid, "Unpinned");
        Ok(())
    }

    fn api_endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.config.api_url.trim_end_matches('/'), command)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth_header {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }
}

/// Strips a leading `ipfs://` from a content id.
pub fn strip_ipfs_scheme(cid: &str) -> &str {
    cid.strip_prefix(IPFS_URI_SCHEME).unwrap_or(cid)
}

/// Node RPC `add` response.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}
