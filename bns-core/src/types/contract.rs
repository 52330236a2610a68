//! Deployer inputs and outputs.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{PROXY_INIT_METHOD, TRANSPARENT_PROXY};

/// Proxy deployment executed through an initializer.
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyInit {
    /// Proxy owner
    pub owner: Address,
    /// Proxy flavour
    pub proxy_contract: String,
    /// Initializer method
    pub method: String,
    /// Initializer arguments
    pub args: Vec<Value>,
}

impl ProxyInit {
    /// Transparent proxy calling `initialize(args)`.
    pub fn transparent(owner: Address, args: Vec<Value>) -> Self {
        Self {
            owner,
            proxy_contract: TRANSPARENT_PROXY.into(),
            method: PROXY_INIT_METHOD.into(),
            args,
        }
    }
}

/// A request to deploy (or resolve) one contract.
#[derive(Clone, Debug, PartialEq)]
pub struct DeployRequest {
    /// Deployment name, unique per network
    pub name: String,
    /// Contract artifact name
    pub contract: String,
    /// Deploying account
    pub from: Address,
    /// Constructor arguments
    pub args: Vec<Value>,
    /// Proxy initializer, for upgradeable deployments
    pub proxy: Option<ProxyInit>,
}

impl DeployRequest {
    /// Plain deployment whose name equals the contract name.
    pub fn new(contract: impl Into<String>, from: Address) -> Self {
        let contract = contract.into();
        Self {
            name: contract.clone(),
            contract,
            from,
            args: Vec::new(),
            proxy: None,
        }
    }

    /// Overrides the deployment name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets constructor arguments.
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Deploys behind a proxy.
    pub fn with_proxy(mut self, proxy: ProxyInit) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// A deployed contract.
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedContract {
    /// Deployment name
    pub name: String,
    /// On-chain address
    pub address: Address,
    /// Contract ABI (JSON array)
    pub abi: Value,
}

impl DeployedContract {
    /// Checksummed address string.
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }
}

/// One call bundled into a multicall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractCall {
    /// Method name
    pub method: String,
    /// Arguments
    pub args: Vec<Value>,
}

impl ContractCall {
    /// Creates a call.
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Accounts used by a deployment run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployerAccounts {
    /// Contract owner and deployer
    pub owner: Address,
    /// Proxy admin
    pub proxy_admin: Address,
}
