//! Toolkit-wide constants: status messages, wire formats, contract names and fact keys.

// ═══════════════════════════════════════════════════════════════════════════════
// STATUS MESSAGES
// ═══════════════════════════════════════════════════════════════════════════════

/// Opaque error message returned for every transport, status and storage failure.
pub const SYSTEM_BUSY: &str = "SYSTEM_BUSY";

/// Message attached to a successful unpin.
pub const UNPIN_SUCCESSFUL: &str = "UNPIN_SUCCESSFUL";

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE FORMATS
// ═══════════════════════════════════════════════════════════════════════════════

/// JSON-RPC protocol version used in request envelopes.
pub const JSON_RPC_VERSION: &str = "2.0";

/// URI scheme accepted (and stripped) in front of content ids.
pub const IPFS_URI_SCHEME: &str = "ipfs://";

/// Extension of every exported JSON artifact.
pub const ARTIFACT_EXTENSION: &str = "json";

/// File recording queued multicall payloads next to deployment records.
pub const PENDING_MULTICALL_FILE: &str = "pending-multicall.json";

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout for HTTP and IPFS clients.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default IPFS node RPC API endpoint.
pub const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";

/// Default public gateway used to build content URLs.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs";

/// Default JSON-RPC endpoint for local development networks.
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Network names that get a mock stablecoin deployed.
pub const LOCAL_NETWORK_NAMES: &[&str] = &["hardhat", "local", "localhost"];

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// The zero address (used as the initial treasury).
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Sentinel address representing a chain's native token.
pub const NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Decimals used when encoding USD prices for the registrar.
pub const PRICE_DECIMALS: u8 = 18;

/// Token quantity required to lock-to-mint a 5+ character name.
pub const LOCK_TO_MINT_BASE_QUANTITY: u64 = 5_000;

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Metadata generator contract.
pub const METADATA_GEN_CONTRACT: &str = "MetadataGen";

/// Label validator contract.
pub const LABEL_VALIDATOR_CONTRACT: &str = "LabelValidator";

/// Public registrar contract.
pub const PUBLIC_REGISTRAR_CONTRACT: &str = "PublicRegistrar";

/// Per-TLD ERC721 registry contract.
pub const REGISTRY_CONTRACT: &str = "Registry";

/// Mock stablecoin deployed on local networks.
pub const MOCK_STABLECOIN_CONTRACT: &str = "UsdcToken";

/// Proxy flavour used for upgradeable deployments.
pub const TRANSPARENT_PROXY: &str = "OpenZeppelinTransparentProxy";

/// Initializer invoked through the proxy.
pub const PROXY_INIT_METHOD: &str = "initialize";

/// Registrar method that registers a TLD registry.
pub const ADD_TLD_METHOD: &str = "addTLD";

// ═══════════════════════════════════════════════════════════════════════════════
// FACT KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Contract-info key holding the metadata generator address.
pub const FACT_METADATA_GEN: &str = "metadataGen";

/// Contract-info key holding the registrar address.
pub const FACT_REGISTRAR: &str = "registrar";

/// Contract-info key holding the TLD name → registry address map.
pub const FACT_REGISTRIES: &str = "registries";

/// ABI export file names.
pub const ABI_REGISTRAR: &str = "registrar";
/// ABI export file name of the metadata generator.
pub const ABI_METADATA_GEN: &str = "metadataGen";
/// ABI export file name of the registry.
pub const ABI_REGISTRY: &str = "registry";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_addresses_are_well_formed() {
        for addr in [ZERO_ADDRESS, NATIVE_TOKEN_ADDRESS] {
            assert!(addr.starts_with("0x"));
            assert_eq!(addr.len(), 42);
        }
    }

    #[test]
    fn test_local_networks_include_hardhat() {
        assert!(LOCAL_NETWORK_NAMES.contains(&"hardhat"));
        assert!(LOCAL_NETWORK_NAMES.contains(&"localhost"));
    }
}
