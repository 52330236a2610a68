//! Common traits for the deploy toolkit.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ContractCall, DeployRequest, DeployedContract, DeployerAccounts};

// ═══════════════════════════════════════════════════════════════════════════════
// DEPLOYER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface the orchestrator deploys contracts through.
///
/// Implementations might:
/// - resolve previously recorded deployments (see `bns_deploy::RecordDeployer`)
/// - sign and broadcast transactions against a node
/// - return canned contracts in tests
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Chain id of the connected network.
    async fn chain_id(&self) -> Result<u64>;

    /// Owner and proxy admin accounts.
    async fn accounts(&self) -> Result<DeployerAccounts>;

    /// Deploys a contract, or returns the existing deployment of the same name.
    async fn deploy(&self, request: DeployRequest) -> Result<DeployedContract>;

    /// Executes a batch of calls on a contract through its `multicall`.
    ///
    /// Returns the transaction hash when the batch was broadcast, `None` when
    /// it was only queued.
    async fn multicall(
        &self,
        contract: &DeployedContract,
        calls: Vec<ContractCall>,
    ) -> Result<Option<String>>;
}
