//! Domain name prices by label length.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::constants::{LOCK_TO_MINT_BASE_QUANTITY, PRICE_DECIMALS};

/// USD prices per label length, in whole dollars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPrices {
    /// 1 character names
    #[serde(rename = "_1char")]
    pub one_char: u64,
    /// 2 character names
    #[serde(rename = "_2chars")]
    pub two_chars: u64,
    /// 3 character names
    #[serde(rename = "_3chars")]
    pub three_chars: u64,
    /// 4 character names
    #[serde(rename = "_4chars")]
    pub four_chars: u64,
    /// 5 or more characters
    #[serde(rename = "_5pchars")]
    pub five_plus_chars: u64,
}

impl Default for DomainPrices {
    fn default() -> Self {
        Self {
            one_char: 6_000,
            two_chars: 3_000,
            three_chars: 680,
            four_chars: 200,
            five_plus_chars: 25,
        }
    }
}

/// Token quantities required to lock-to-mint, per label length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockToMintQuantities {
    /// 1 character names
    #[serde(rename = "_1char")]
    pub one_char: u64,
    /// 2 character names
    #[serde(rename = "_2chars")]
    pub two_chars: u64,
    /// 3 character names
    #[serde(rename = "_3chars")]
    pub three_chars: u64,
    /// 4 character names
    #[serde(rename = "_4chars")]
    pub four_chars: u64,
    /// 5 or more characters
    #[serde(rename = "_5pchars")]
    pub five_plus_chars: u64,
}

impl DomainPrices {
    /// Prices in registrar order (1 char first).
    pub fn as_array(&self) -> [u64; 5] {
        [
            self.one_char,
            self.two_chars,
            self.three_chars,
            self.four_chars,
            self.five_plus_chars,
        ]
    }

    /// Prices scaled to 18 decimals, as passed to `addTLD`.
    pub fn to_wei_values(&self) -> Vec<U256> {
        let scale = U256::from(10u64).pow(U256::from(PRICE_DECIMALS));
        self.as_array()
            .iter()
            .map(|p| U256::from(*p) * scale)
            .collect()
    }

    /// Scaled prices as decimal strings, for JSON call payloads.
    pub fn to_wei_strings(&self) -> Vec<String> {
        self.to_wei_values().iter().map(|v| v.to_string()).collect()
    }

    /// Lock-to-mint quantities relative to the 5+ char price.
    ///
    /// A 5+ char name requires `base` tokens; longer-priced names scale
    /// proportionally. Returns `None` when the 5+ char price is zero.
    pub fn lock_to_mint_quantities(&self, base: u64) -> Option<LockToMintQuantities> {
        if self.five_plus_chars == 0 {
            return None;
        }
        let qty = |price: u64| -> u64 {
            (u128::from(price) * u128::from(base) / u128::from(self.five_plus_chars)) as u64
        };
        Some(LockToMintQuantities {
            one_char: qty(self.one_char),
            two_chars: qty(self.two_chars),
            three_chars: qty(self.three_chars),
            four_chars: qty(self.four_chars),
            five_plus_chars: base,
        })
    }

    /// Lock-to-mint quantities with the default base quantity.
    pub fn default_lock_to_mint(&self) -> Option<LockToMintQuantities> {
        self.lock_to_mint_quantities(LOCK_TO_MINT_BASE_QUANTITY)
    }
}
