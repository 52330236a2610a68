//! Domain types for the deploy toolkit.
//!
//! - [`FactSet`]: facts produced by one deployment run
//! - [`ExportTarget`]: where a fact set gets merged
//! - [`NetworkProfile`]: typed per-network deployment configuration
//! - [`DomainPrices`]: per-length name prices
//! - [`DeployRequest`] / [`DeployedContract`]: deployer inputs and outputs

mod contract;
mod facts;
mod network;
mod prices;

pub use contract::*;
pub use facts::*;
pub use network::*;
pub use prices::*;
