//! Per-network deployment configuration.

use serde::{Deserialize, Serialize};

use crate::constants::LOCAL_NETWORK_NAMES;
use crate::error::{BnsError, Result};
use crate::utils::is_eth_address;

/// Where a payment token's USD price comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFeedSource {
    /// A Chainlink aggregator
    Chainlink,
    /// A DEX pair
    Dex,
}

/// DEX contracts used to price a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexInfo {
    /// Factory contract
    pub factory: String,
    /// Router contract
    pub router: String,
    /// Token the pair is priced against
    pub price_pair_token: String,
}

/// A token accepted for registration payments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentToken {
    /// Ticker symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Token contract (or the native-token sentinel)
    pub token_address: String,
    /// Price feed flavour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_feed_source: Option<PriceFeedSource>,
    /// Price feed contract
    pub price_feed_contract: String,
    /// DEX pricing info
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dex_info: Option<DexInfo>,
    /// Whether payments are accepted
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Unix ms when the token was added
    #[serde(default)]
    pub added_on: i64,
    /// Unix ms of the last update
    #[serde(default)]
    pub updated_on: i64,
}

fn default_enabled() -> bool {
    true
}

impl PaymentToken {
    /// Creates an enabled token stamped with the current time.
    pub fn new(token_address: impl Into<String>, price_feed_contract: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            symbol: None,
            token_address: token_address.into(),
            price_feed_source: None,
            price_feed_contract: price_feed_contract.into(),
            dex_info: None,
            enabled: true,
            added_on: now,
            updated_on: now,
        }
    }

    /// Sets the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Sets the price feed source.
    pub fn with_source(mut self, source: PriceFeedSource) -> Self {
        self.price_feed_source = Some(source);
        self
    }

    /// Sets DEX info.
    pub fn with_dex(mut self, dex: DexInfo) -> Self {
        self.dex_info = Some(dex);
        self
    }
}

/// Payment configuration of a network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTokenConfig {
    /// Stablecoin the registrar prices in. `None` on local networks, where
    /// the mock token's address is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_stablecoin: Option<String>,
    /// Accepted tokens
    #[serde(default)]
    pub payment_tokens: Vec<PaymentToken>,
}

impl PaymentTokenConfig {
    /// Tokens currently accepted for payment.
    pub fn enabled_tokens(&self) -> impl Iterator<Item = &PaymentToken> {
        self.payment_tokens.iter().filter(|t| t.enabled)
    }
}

/// A top-level domain to deploy a registry for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TldConfig {
    /// ERC721 collection name
    pub name: String,
    /// ERC721 symbol
    pub symbol: String,
    /// The TLD label, e.g. "bnb"
    pub tld_name: String,
    /// Web host used in token metadata
    pub web_host: String,
}

impl TldConfig {
    /// Creates a TLD entry.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        tld_name: impl Into<String>,
        web_host: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            tld_name: tld_name.into(),
            web_host: web_host.into(),
        }
    }
}

/// Everything the orchestrator needs to know about a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// Network name
    pub name: String,
    /// Expected chain id, checked against the deployer when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Payment configuration
    #[serde(default)]
    pub payment: PaymentTokenConfig,
    /// TLDs to deploy registries for
    #[serde(default)]
    pub tlds: Vec<TldConfig>,
}

impl NetworkProfile {
    /// True for development networks that get a mock stablecoin.
    pub fn is_local(&self) -> bool {
        is_local_network(&self.name)
    }

    /// Checks addresses and TLD names.
    pub fn validate(&self) -> Result<()> {
        if let Some(stable) = &self.payment.default_stablecoin {
            if !is_eth_address(stable) {
                return Err(BnsError::ValidationError(format!(
                    "{}: invalid default stablecoin '{}'",
                    self.name, stable
                )));
            }
        }

        for token in &self.payment.payment_tokens {
            if !is_eth_address(&token.token_address) {
                return Err(BnsError::ValidationError(format!(
                    "{}: invalid payment token address '{}'",
                    self.name, token.token_address
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for tld in &self.tlds {
            let label = tld.tld_name.trim().to_lowercase();
            if label.is_empty() || label.contains('.') {
                return Err(BnsError::ValidationError(format!(
                    "{}: invalid TLD name '{}'",
                    self.name, tld.tld_name
                )));
            }
            if !seen.insert(label) {
                return Err(BnsError::ValidationError(format!(
                    "{}: duplicate TLD '{}'",
                    self.name, tld.tld_name
                )));
            }
        }

        Ok(())
    }
}

/// True for names of development networks (`hardhat`, `localhost`, `local*`).
pub fn is_local_network(name: &str) -> bool {
    LOCAL_NETWORK_NAMES.contains(&name) || name.starts_with("local")
}
