//! Domain types for Tokenlens.

use serde::{Deserialize, Serialize};

/// Token metadata as returned by the metadata API.
///
/// Only `address` is guaranteed; every descriptive field is optional and
/// passed through as-is. The cache and fetch coordinator impose no
/// validation on this shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    /// On-chain address identifying the token.
    pub address: String,
    /// Human-readable token name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ticker symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Decimal precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    /// Logo image URI.
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    /// Free-form project description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project website URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Twitter handle or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// Telegram channel URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    /// Discord invite URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    /// Last known price in USD.
    #[serde(rename = "priceUSD", default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    /// Market capitalization in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// 24-hour trading volume in USD.
    #[serde(rename = "volume24h", default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    /// Number of holder accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holders: Option<u64>,
}

impl TokenMetadata {
    /// Creates a metadata record with only the address populated.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            symbol: None,
            decimals: None,
            logo_uri: None,
            description: None,
            website: None,
            twitter: None,
            telegram: None,
            discord: None,
            price_usd: None,
            market_cap: None,
            volume_24h: None,
            holders: None,
        }
    }
}
