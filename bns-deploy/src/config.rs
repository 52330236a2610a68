//! Deploy configuration: `.secrets.json` plus environment overrides.

use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bns_core::constants::DEFAULT_LOCAL_RPC_URL;
use bns_core::utils::parse_address;
use bns_core::{BnsError, DeployerAccounts, DomainPrices, ExportTarget, Result};
use bns_export::ExporterConfig;
use bns_ipfs::IpfsConfig;

/// Overrides `rpcUrl`.
pub const ENV_RPC_URL: &str = "BNS_RPC_URL";
/// Overrides `deploymentsDir`.
pub const ENV_DEPLOYMENTS_DIR: &str = "BNS_DEPLOYMENTS_DIR";
/// Overrides `owner`.
pub const ENV_OWNER: &str = "BNS_OWNER";
/// Overrides `proxyAdmin`.
pub const ENV_PROXY_ADMIN: &str = "BNS_PROXY_ADMIN";
/// Overrides `ipfsConfig.apiUrl`.
pub const ENV_IPFS_API_URL: &str = "IPFS_API_URL";
/// Overrides `ipfsConfig.gatewayEndpoint`.
pub const ENV_IPFS_GATEWAY_ENDPOINT: &str = "IPFS_GATEWAY_ENDPOINT";
/// Overrides `ipfsConfig.authHeader`.
pub const ENV_IPFS_AUTH_HEADER: &str = "IPFS_AUTH_HEADER";

const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// Configuration of a deployment run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    /// Node RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Owner account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Proxy admin account, defaults to the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_admin: Option<String>,
    /// Files receiving the TLD → chain ids map
    #[serde(default)]
    pub tlds_export_paths: Vec<PathBuf>,
    /// Directories receiving `<chainId>.json` contract info
    #[serde(default)]
    pub contract_info_export_paths: Vec<PathBuf>,
    /// Directories receiving `<chainId>/<name>.json` ABIs
    #[serde(default)]
    pub abi_export_paths: Vec<PathBuf>,
    /// Root of recorded deployments, one subdirectory per network
    #[serde(default = "default_deployments_dir")]
    pub deployments_dir: PathBuf,
    /// IPFS node used to publish contract info
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_config: Option<IpfsConfig>,
    /// Publish the contract info document to IPFS after export
    #[serde(default)]
    pub publish_to_ipfs: bool,
    /// Registration prices passed to `addTLD`
    #[serde(default)]
    pub domain_prices: DomainPrices,
    /// Artifact exporter settings
    #[serde(default)]
    pub exporter: ExporterConfig,
}

fn default_rpc_url() -> String {
    DEFAULT_LOCAL_RPC_URL.into()
}

fn default_deployments_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DEPLOYMENTS_DIR)
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            owner: None,
            proxy_admin: None,
            tlds_export_paths: Vec::new(),
            contract_info_export_paths: Vec::new(),
            abi_export_paths: Vec::new(),
            deployments_dir: default_deployments_dir(),
            ipfs_config: None,
            publish_to_ipfs: false,
            domain_prices: DomainPrices::default(),
            exporter: ExporterConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Loads `.env`, the config file if it exists, then environment overrides.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = path.as_ref();

        let config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await?
        } else {
            info!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        let config = config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON config file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            BnsError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), "Config file loaded");
        Ok(config)
    }

    /// Parses JSON config text.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| BnsError::ConfigError(format!("invalid deploy config: {}", e)))
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_RPC_URL) {
            self.rpc_url = url;
        }
        if let Some(dir) = get(ENV_DEPLOYMENTS_DIR) {
            self.deployments_dir = PathBuf::from(dir);
        }
        if let Some(owner) = get(ENV_OWNER) {
            self.owner = Some(owner);
        }
        if let Some(admin) = get(ENV_PROXY_ADMIN) {
            self.proxy_admin = Some(admin);
        }

        let api_url = get(ENV_IPFS_API_URL);
        let gateway = get(ENV_IPFS_GATEWAY_ENDPOINT);
        let auth = get(ENV_IPFS_AUTH_HEADER);
        if api_url.is_some() || gateway.is_some() || auth.is_some() {
            let ipfs = self.ipfs_config.get_or_insert_with(IpfsConfig::default);
            if let Some(url) = api_url {
                ipfs.api_url = url;
            }
            if let Some(gateway) = gateway {
                ipfs.gateway_endpoint = gateway;
            }
            if auth.is_some() {
                ipfs.auth_header = auth;
            }
        }

        self
    }

    /// Checks URLs, accounts and the IPFS settings.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.rpc_url).map_err(|e| {
            BnsError::ConfigError(format!("rpcUrl '{}' is not a URL: {}", self.rpc_url, e))
        })?;

        for account in [&self.owner, &self.proxy_admin].into_iter().flatten() {
            parse_address(account)?;
        }

        if let Some(ipfs) = &self.ipfs_config {
            ipfs.validate()?;
        }

        if self.publish_to_ipfs && self.ipfs_config.is_none() {
            return Err(BnsError::ConfigError(
                "publishToIpfs is set but ipfsConfig is missing".into(),
            ));
        }

        Ok(())
    }

    /// Owner and proxy admin accounts. The proxy admin defaults to the owner.
    pub fn accounts(&self) -> Result<DeployerAccounts> {
        let owner = self
            .owner
            .as_deref()
            .ok_or_else(|| BnsError::ConfigError(format!("owner is not configured (set {})", ENV_OWNER)))
            .and_then(parse_address)?;

        let proxy_admin = match self.proxy_admin.as_deref() {
            Some(admin) => parse_address(admin)?,
            None => owner,
        };

        Ok(DeployerAccounts { owner, proxy_admin })
    }

    /// TLD export files as targets.
    pub fn tlds_targets(&self) -> Vec<ExportTarget> {
        self.tlds_export_paths.iter().cloned().map(ExportTarget::File).collect()
    }

    /// Contract info directories as targets.
    pub fn contract_info_targets(&self) -> Vec<ExportTarget> {
        self.contract_info_export_paths
            .iter()
            .cloned()
            .map(ExportTarget::Directory)
            .collect()
    }

    /// Recorded deployments of one network.
    pub fn network_deployments_dir(&self, network: &str) -> PathBuf {
        self.deployments_dir.join(network)
    }

    /// Sets the owner account.
    pub fn with_owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner.to_checksum(None));
        self
    }
}
