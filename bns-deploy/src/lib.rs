//! # BNS Deploy
//!
//! Orchestrates a deployment run of the BNS contract set and publishes its
//! results.
//!
//! ## Components
//!
//! - [`NetworkRegistry`]: network name → [`NetworkProfile`](bns_core::NetworkProfile)
//! - [`DeployConfig`]: export paths, deployments directory, IPFS settings
//! - [`RecordDeployer`]: a [`ContractDeployer`](bns_core::ContractDeployer)
//!   backed by recorded deployment files
//! - [`Orchestrator`]: the deployment sequence and artifact export
//!
//! ## Example
//!
//! ```rust,ignore
//! use bns_deploy::{DeployConfig, NetworkRegistry, Orchestrator, RecordDeployer};
//!
//! let config = DeployConfig::load(".secrets.json").await?;
//! let profile = NetworkRegistry::with_builtins().resolve("bsc_testnet")?;
//! let deployer = RecordDeployer::open(&config.deployments_dir, "bsc_testnet", config.accounts()?).await?;
//!
//! let summary = Orchestrator::new(deployer, config).run(&profile).await?;
//! println!("registrar: {}", summary.facts.get("registrar").unwrap());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod deployer;
mod orchestrator;
mod registry;

pub use config::{
    DeployConfig, ENV_DEPLOYMENTS_DIR, ENV_IPFS_API_URL, ENV_IPFS_AUTH_HEADER,
    ENV_IPFS_GATEWAY_ENDPOINT, ENV_OWNER, ENV_PROXY_ADMIN, ENV_RPC_URL,
};
pub use deployer::{PendingMulticall, RecordDeployer};
pub use orchestrator::{Orchestrator, RunSummary};
pub use registry::{NetworkRegistry, ProfileLoader};
