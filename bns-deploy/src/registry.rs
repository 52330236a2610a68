//! Network profile registry.
//!
//! Maps network names to profile loaders. Built-in profiles cover the
//! networks the contracts have been deployed to; more can be registered in
//! code or loaded from JSON files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use bns_core::constants::NATIVE_TOKEN_ADDRESS;
use bns_core::{
    is_local_network, BnsError, DexInfo, NetworkProfile, PaymentToken, PaymentTokenConfig,
    PriceFeedSource, Result, TldConfig,
};

/// Builds a profile for the requested network name.
pub type ProfileLoader = Arc<dyn Fn(&str) -> Result<NetworkProfile> + Send + Sync>;

/// Profile used for `hardhat`, `localhost` and any `local*` network.
const LOCAL_PROFILE: &str = "local";

/// Registry of network profiles.
#[derive(Clone, Default)]
pub struct NetworkRegistry {
    loaders: BTreeMap<String, ProfileLoader>,
}

impl fmt::Debug for NetworkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkRegistry")
            .field("networks", &self.names())
            .finish()
    }
}

impl NetworkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in profiles.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(LOCAL_PROFILE, local_profile);
        registry.register("hardhat", local_profile);
        registry.register("localhost", local_profile);
        registry.register("bsc_testnet", |_| Ok(bsc_testnet_profile()));
        registry.register("bsc_mainnet", |_| Ok(bsc_mainnet_profile()));
        registry.register("eth_goerli", |_| Ok(eth_goerli_profile()));
        registry.register("polygon_testnet", |_| Ok(polygon_testnet_profile()));
        registry
    }

    /// Registers (or replaces) a loader for a network name.
    pub fn register<F>(&mut self, name: impl Into<String>, loader: F)
    where
        F: Fn(&str) -> Result<NetworkProfile> + Send + Sync + 'static,
    {
        self.loaders.insert(name.into(), Arc::new(loader));
    }

    /// Registers a fixed profile under its own name.
    pub fn register_profile(&mut self, profile: NetworkProfile) {
        let name = profile.name.clone();
        self.register(name, move |_| Ok(profile.clone()));
    }

    /// Loads every `*.json` file in `dir` as a [`NetworkProfile`].
    ///
    /// Profiles are validated before they are registered. Returns the number
    /// of profiles loaded.
    pub async fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
            BnsError::ConfigError(format!("cannot read profile dir {}: {}", dir.display(), e))
        })?;

        let mut loaded = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let contents = tokio::fs::read_to_string(&path).await?;
            let profile: NetworkProfile = serde_json::from_str(&contents).map_err(|e| {
                BnsError::ConfigError(format!("invalid profile {}: {}", path.display(), e))
            })?;
            profile.validate()?;

            debug!(network = %profile.name, path = %path.display(), "Profile loaded");
            self.register_profile(profile);
            loaded += 1;
        }

        info!(dir = %dir.display(), loaded, "Network profiles loaded");
        Ok(loaded)
    }

    /// Resolves and validates the profile for `network`.
    ///
    /// An exact registration wins; otherwise local development names fall
    /// back to the `local` profile.
    pub fn resolve(&self, network: &str) -> Result<NetworkProfile> {
        let loader = self
            .loaders
            .get(network)
            .or_else(|| {
                is_local_network(network)
                    .then(|| self.loaders.get(LOCAL_PROFILE))
                    .flatten()
            })
            .ok_or_else(|| BnsError::UnknownNetwork(network.to_string()))?;

        let profile = loader(network)?;
        profile.validate()?;
        Ok(profile)
    }

    /// True if `network` resolves to a registered loader.
    pub fn contains(&self, network: &str) -> bool {
        self.loaders.contains_key(network)
            || (is_local_network(network) && self.loaders.contains_key(LOCAL_PROFILE))
    }

    /// Registered network names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILT-IN PROFILES
// ═══════════════════════════════════════════════════════════════════════════════

const PANCAKE_TESTNET_FACTORY: &str = "0x6725F303b657a9451d8BA641348b6761A6CC7a17";
const PANCAKE_TESTNET_ROUTER: &str = "0xD99D1c33F9fC3444f8101754aBC46c52416550D1";
const PANCAKE_FACTORY: &str = "0xcA143Ce32Fe78f1f7019d7d551a6402fC5350c73";
const PANCAKE_ROUTER: &str = "0x10ED43C718714eb63d5aA57B78B54704E256024E";
const NO_PAIR_TOKEN: &str = "0x0000000000000000000000000000000000000000";

const TESTNET_STABLECOIN: &str = "0x5ea7D6A33D3655F661C298ac8086708148883c34";
const TESTNET_BNB_USD_FEED: &str = "0x2514895c72f50D8bd4B4F9b1110F0D6bD2c97526";
const TESTNET_CAKE: &str = "0xa35062141Fa33BCA92Ce69FeD37D0E8908868AAe";
const TESTNET_CAKE_USD_FEED: &str = "0x81faeDDfeBc2F8Ac524327d70Cf913001732224C";

fn default_tlds() -> Vec<TldConfig> {
    vec![TldConfig::new("BNB Domains", "BNB", "bnb", "https://bns.gg")]
}

fn pancake_testnet() -> DexInfo {
    DexInfo {
        factory: PANCAKE_TESTNET_FACTORY.into(),
        router: PANCAKE_TESTNET_ROUTER.into(),
        price_pair_token: NO_PAIR_TOKEN.into(),
    }
}

fn local_profile(network: &str) -> Result<NetworkProfile> {
    // The stablecoin is the mock token deployed during the run.
    Ok(NetworkProfile {
        name: network.to_string(),
        chain_id: None,
        payment: PaymentTokenConfig {
            default_stablecoin: None,
            payment_tokens: vec![PaymentToken::new(NATIVE_TOKEN_ADDRESS, NO_PAIR_TOKEN)
                .with_symbol("eth")
                .with_source(PriceFeedSource::Dex)
                .with_dex(pancake_testnet())],
        },
        tlds: default_tlds(),
    })
}

fn bsc_testnet_profile() -> NetworkProfile {
    NetworkProfile {
        name: "bsc_testnet".into(),
        chain_id: Some(97),
        payment: PaymentTokenConfig {
            default_stablecoin: Some(TESTNET_STABLECOIN.into()),
            payment_tokens: vec![
                PaymentToken::new(NATIVE_TOKEN_ADDRESS, TESTNET_BNB_USD_FEED)
                    .with_symbol("bnb")
                    .with_source(PriceFeedSource::Chainlink)
                    .with_dex(pancake_testnet()),
                PaymentToken::new(TESTNET_CAKE, TESTNET_CAKE_USD_FEED)
                    .with_symbol("cake")
                    .with_source(PriceFeedSource::Chainlink)
                    .with_dex(pancake_testnet()),
            ],
        },
        tlds: default_tlds(),
    }
}

fn bsc_mainnet_profile() -> NetworkProfile {
    let pancake = DexInfo {
        factory: PANCAKE_FACTORY.into(),
        router: PANCAKE_ROUTER.into(),
        price_pair_token: NO_PAIR_TOKEN.into(),
    };

    NetworkProfile {
        name: "bsc_mainnet".into(),
        chain_id: Some(56),
        payment: PaymentTokenConfig {
            // BUSD
            default_stablecoin: Some("0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56".into()),
            payment_tokens: vec![PaymentToken::new(
                NATIVE_TOKEN_ADDRESS,
                "0x0567F2323251f0Aab15c8dFb1967E4e8A7D42aeE",
            )
            .with_symbol("bnb")
            .with_source(PriceFeedSource::Chainlink)
            .with_dex(pancake)],
        },
        tlds: default_tlds(),
    }
}

fn eth_goerli_profile() -> NetworkProfile {
    let usdc = "0x07865c6e87b9f70255377e024ace6630c1eaa37f";

    NetworkProfile {
        name: "eth_goerli".into(),
        chain_id: Some(5),
        payment: PaymentTokenConfig {
            default_stablecoin: Some(usdc.into()),
            payment_tokens: vec![
                PaymentToken::new(NATIVE_TOKEN_ADDRESS, "0xD4a33860578De61DBAbDc8BFdb98FD742fA7028e"),
                PaymentToken::new(usdc, "0xAb5c49580294Aff77670F839ea425f5b78ab3Ae7"),
            ],
        },
        tlds: default_tlds(),
    }
}

fn polygon_testnet_profile() -> NetworkProfile {
    NetworkProfile {
        name: "polygon_testnet".into(),
        chain_id: Some(80001),
        payment: PaymentTokenConfig {
            default_stablecoin: Some(TESTNET_STABLECOIN.into()),
            payment_tokens: vec![
                PaymentToken::new(NATIVE_TOKEN_ADDRESS, TESTNET_BNB_USD_FEED),
                PaymentToken::new(TESTNET_CAKE, TESTNET_CAKE_USD_FEED),
            ],
        },
        tlds: default_tlds(),
    }
}
