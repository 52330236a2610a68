//! Deployer backed by recorded deployment files.
//!
//! Layout under the deployments directory:
//!
//! ```text
//! deployments/
//!   bsc_testnet/
//!     .chainId                 "97"
//!     PublicRegistrar.json     { "address": "0x…", "abi": [ … ] }
//!     pending-multicall.json   queued batches
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy::primitives::Address;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use bns_core::constants::PENDING_MULTICALL_FILE;
use bns_core::{
    BnsError, ContractCall, ContractDeployer, DeployRequest, DeployedContract, DeployerAccounts,
    Result,
};

/// File holding the chain id of a network's deployments.
const CHAIN_ID_FILE: &str = ".chainId";

#[derive(Debug, Deserialize)]
struct DeploymentRecord {
    address: String,
    #[serde(default)]
    abi: Value,
}

/// A multicall batch waiting to be submitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMulticall {
    /// Deployment name of the target contract
    pub contract: String,
    /// Target address
    pub target: String,
    /// Calls in execution order
    pub calls: Vec<ContractCall>,
    /// Unix ms when the batch was queued
    pub queued_at: i64,
}

/// Resolves contracts from `<deployments_dir>/<network>/<name>.json`.
///
/// Nothing is broadcast: `deploy` returns the recorded deployment and
/// `multicall` queues the batch in `pending-multicall.json`.
#[derive(Debug)]
pub struct RecordDeployer {
    network: String,
    network_dir: PathBuf,
    chain_id: u64,
    accounts: DeployerAccounts,
    resolved: RwLock<HashMap<String, DeployedContract>>,
    queue_lock: Mutex<()>,
}

impl RecordDeployer {
    /// Opens the records of `network`, reading the chain id from `.chainId`.
    pub async fn open(
        deployments_dir: impl AsRef<Path>,
        network: impl Into<String>,
        accounts: DeployerAccounts,
    ) -> Result<Self> {
        let network = network.into();
        let network_dir = deployments_dir.as_ref().join(&network);
        let chain_id_path = network_dir.join(CHAIN_ID_FILE);

        let raw = tokio::fs::read_to_string(&chain_id_path).await.map_err(|e| {
            BnsError::ConfigError(format!(
                "cannot read chain id from {}: {}",
                chain_id_path.display(),
                e
            ))
        })?;
        let chain_id = raw.trim().parse::<u64>().map_err(|e| {
            BnsError::ConfigError(format!("invalid chain id '{}': {}", raw.trim(), e))
        })?;

        Ok(Self::with_chain_id(deployments_dir, network, chain_id, accounts))
    }

    /// Creates a deployer with a known chain id.
    pub fn with_chain_id(
        deployments_dir: impl AsRef<Path>,
        network: impl Into<String>,
        chain_id: u64,
        accounts: DeployerAccounts,
    ) -> Self {
        let network = network.into();
        Self {
            network_dir: deployments_dir.as_ref().join(&network),
            network,
            chain_id,
            accounts,
            resolved: RwLock::new(HashMap::new()),
            queue_lock: Mutex::new(()),
        }
    }

    /// Network name.
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Path of the multicall queue.
    pub fn pending_path(&self) -> PathBuf {
        self.network_dir.join(PENDING_MULTICALL_FILE)
    }

    /// Batches queued so far.
    pub async fn pending_multicalls(&self) -> Result<Vec<PendingMulticall>> {
        let path = self.pending_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text).map_err(|e| BnsError::CorruptDocument {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_record(&self, name: &str) -> Result<DeployedContract> {
        let path = self.network_dir.join(format!("{}.json", name));

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BnsError::DeploymentNotFound {
                    name: name.to_string(),
                    network: self.network.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let record: DeploymentRecord =
            serde_json::from_str(&contents).map_err(|e| BnsError::DeployFailed {
                name: name.to_string(),
                reason: format!("invalid record {}: {}", path.display(), e),
            })?;

        let address = Address::from_str(&record.address).map_err(|e| BnsError::DeployFailed {
            name: name.to_string(),
            reason: format!("invalid address '{}': {}", record.address, e),
        })?;

        let abi = match record.abi {
            Value::Null => Value::Array(Vec::new()),
            abi => abi,
        };

        Ok(DeployedContract {
            name: name.to_string(),
            address,
            abi,
        })
    }
}

#[async_trait]
impl ContractDeployer for RecordDeployer {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn accounts(&self) -> Result<DeployerAccounts> {
        Ok(self.accounts)
    }

    #[instrument(skip(self, request), fields(name = %request.name, network = %self.network))]
    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract> {
        let cached = self.resolved.read().get(&request.name).cloned();
        if let Some(existing) = cached {
            return Ok(existing);
        }

        let contract = self.read_record(&request.name).await?;
        debug!(address = %contract.address_string(), "Deployment resolved from record");

        self.resolved
            .write()
            .insert(request.name.clone(), contract.clone());
        Ok(contract)
    }

    #[instrument(skip(self, contract, calls), fields(contract = %contract.name, calls = calls.len()))]
    async fn multicall(
        &self,
        contract: &DeployedContract,
        calls: Vec<ContractCall>,
    ) -> Result<Option<String>> {
        let _guard = self.queue_lock.lock().await;

        let mut pending = self.pending_multicalls().await?;
        pending.push(PendingMulticall {
            contract: contract.name.clone(),
            target: contract.address_string(),
            calls,
            queued_at: chrono::Utc::now().timestamp_millis(),
        });

        tokio::fs::create_dir_all(&self.network_dir).await?;
        let mut contents = serde_json::to_string_pretty(&pending)?;
        contents.push('\n');
        tokio::fs::write(self.pending_path(), contents).await?;

        info!(queued = pending.len(), "Multicall queued for submission");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    const REGISTRAR: &str = "0x5ea7D6A33D3655F661C298ac8086708148883c34";

    fn accounts() -> DeployerAccounts {
        DeployerAccounts {
            owner: Address::with_last_byte(1),
            proxy_admin: Address::with_last_byte(2),
        }
    }

    async fn write_record(dir: &Path, name: &str, record: Value) {
        tokio::fs::create_dir_all(dir).await.unwrap();
        tokio::fs::write(dir.join(format!("{}.json", name)), record.to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_reads_chain_id() {
        let dir = tempdir().unwrap();
        let network_dir = dir.path().join("bsc_testnet");
        tokio::fs::create_dir_all(&network_dir).await.unwrap();
        tokio::fs::write(network_dir.join(".chainId"), "97\n").await.unwrap();

        let deployer = RecordDeployer::open(dir.path(), "bsc_testnet", accounts())
            .await
            .unwrap();
        assert_eq!(deployer.chain_id().await.unwrap(), 97);
        assert_eq!(deployer.accounts().await.unwrap(), accounts());
        assert_eq!(deployer.network(), "bsc_testnet");
    }

    #[tokio::test]
    async fn test_open_without_chain_id() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RecordDeployer::open(dir.path(), "bsc_testnet", accounts()).await,
            Err(BnsError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_deploy_resolves_record() {
        let dir = tempdir().unwrap();
        write_record(
            &dir.path().join("bsc_testnet"),
            "PublicRegistrar",
            json!({"address": REGISTRAR, "abi": [{"type": "function", "name": "addTLD"}], "receipt": {}}),
        )
        .await;

        let deployer = RecordDeployer::with_chain_id(dir.path(), "bsc_testnet", 97, accounts());
        let contract = deployer
            .deploy(DeployRequest::new("PublicRegistrar", accounts().owner))
            .await
            .unwrap();

        assert_eq!(contract.name, "PublicRegistrar");
        assert_eq!(contract.address_string(), REGISTRAR);
        assert_eq!(contract.abi[0]["name"], "addTLD");
    }

    #[tokio::test]
    async fn test_deploy_caches_resolved_contracts() {
        let dir = tempdir().unwrap();
        let network_dir = dir.path().join("local");
        write_record(&network_dir, "MetadataGen", json!({"address": REGISTRAR})).await;

        let deployer = RecordDeployer::with_chain_id(dir.path(), "local", 31337, accounts());
        let first = deployer
            .deploy(DeployRequest::new("MetadataGen", accounts().owner))
            .await
            .unwrap();
        assert_eq!(first.abi, json!([]));

        tokio::fs::remove_file(network_dir.join("MetadataGen.json"))
            .await
            .unwrap();
        let second = deployer
            .deploy(DeployRequest::new("MetadataGen", accounts().owner))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let dir = tempdir().unwrap();
        let deployer = RecordDeployer::with_chain_id(dir.path(), "bsc_testnet", 97, accounts());

        let err = deployer
            .deploy(DeployRequest::new("Registry", accounts().owner))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BnsError::DeploymentNotFound { ref name, ref network }
                if name == "Registry" && network == "bsc_testnet"
        ));
    }

    #[tokio::test]
    async fn test_invalid_record_address() {
        let dir = tempdir().unwrap();
        write_record(&dir.path().join("local"), "Registry", json!({"address": "0x12"})).await;

        let deployer = RecordDeployer::with_chain_id(dir.path(), "local", 31337, accounts());
        assert!(matches!(
            deployer
                .deploy(DeployRequest::new("Registry", accounts().owner))
                .await,
            Err(BnsError::DeployFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_multicall_is_queued() {
        let dir = tempdir().unwrap();
        let deployer = RecordDeployer::with_chain_id(dir.path(), "local", 31337, accounts());
        let registrar = DeployedContract {
            name: "PublicRegistrar".into(),
            address: Address::from_str(REGISTRAR).unwrap(),
            abi: json!([]),
        };

        let tx = deployer
            .multicall(&registrar, vec![ContractCall::new("addTLD", vec![json!("bnb")])])
            .await
            .unwrap();
        assert!(tx.is_none());

        deployer
            .multicall(&registrar, vec![ContractCall::new("addTLD", vec![json!("test")])])
            .await
            .unwrap();

        let pending = deployer.pending_multicalls().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].target, REGISTRAR);
        assert_eq!(pending[1].calls[0].args, vec![json!("test")]);
        assert!(deployer.pending_path().ends_with("local/pending-multicall.json"));
    }
}
