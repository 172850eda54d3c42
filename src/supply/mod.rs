//! IBC token supply refresh
//!
//! Discovers the IBC denoms accepted for fee payment on a network, looks each
//! one up on CoinGecko, and rewrites the config's ibc_tokens_total_supply
//! field with the circulating supply scaled to the token's on-chain decimals.
//! The scaling is exact base-10 integer math, never a float multiply.

use anyhow::{Context, Result};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::chain::ChainClient;
use crate::config::{ConfigStore, NetworkConfig, TotalSupplyEntry};

/// Denoms whose supply is never refreshed
const SKIP_SUPPLY: &[&str] = &[
    // stOSMO
    "ibc/75249A18DEFBEFE55F83B1C70CAD234DF164F174C6BC51682EE92C2C81C18C93",
];

/// Denom to CoinGecko coin id. Denoms without an entry are skipped.
const GECKO_IDS: &[(&str, &str)] = &[
    (
        "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2",
        "cosmos",
    ),
    (
        "ibc/ED07A3391A112B175915CD8FAF43A2DA8E4790EDE12566649D0C2F97716B8518",
        "osmosis",
    ),
    (
        "ibc/75249A18DEFBEFE55F83B1C70CAD234DF164F174C6BC51682EE92C2C81C18C93",
        "stride-staked-osmo",
    ),
    (
        "ibc/6AE98883D4D5D5FF9E50D7130F1305DA2FFA0C652D1DD9C123657C6B4EB2DF8A",
        "evmos",
    ),
    (
        "ibc/987C17B11ABC2B20019178ACE62929FE9840202CE79498E29FE8E5CB02B7C0A4",
        "stargaze",
    ),
    (
        "ibc/46B44899322F3CD854D2D46DEEF881958467CDD4B3B10086DA49296BBED94BED",
        "juno-network",
    ),
];

/// Structural test for an IBC-transferred denom: "ibc/" followed by a 64
/// character uppercase hex trace hash
pub fn is_ibc_denom(denom: &str) -> bool {
    match denom.strip_prefix("ibc/") {
        Some(hash) => hash.len() == 64 && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')),
        None => false,
    }
}

/// CoinGecko id for a denom, if one is mapped
pub fn gecko_id(denom: &str) -> Option<&'static str> {
    GECKO_IDS
        .iter()
        .find(|(d, _)| *d == denom)
        .map(|(_, id)| *id)
}

/// Convert a raw circulating_supply JSON value to a decimal, zero when the
/// field is absent or malformed
pub fn supply_or_zero(value: Option<&serde_json::Value>) -> BigDecimal {
    let text = match value {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => return BigDecimal::zero(),
    };
    BigDecimal::from_str(&text).unwrap_or_else(|_| BigDecimal::zero())
}

/// Scale a supply figure by 10^decimals and render it as a base-10 integer
/// string, truncating any sub-unit remainder
pub fn scale_amount(supply: &BigDecimal, decimals: u32) -> String {
    let shift = BigDecimal::new(BigInt::from(1), -(decimals as i64));
    (supply * shift)
        .with_scale_round(0, RoundingMode::Down)
        .to_string()
}

#[derive(Debug, Deserialize)]
struct CoinResponse {
    #[serde(default)]
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    circulating_supply: Option<serde_json::Value>,
}

/// CoinGecko market data client
pub struct GeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeckoClient {
    /// Default endpoint, overridable with COINGECKO_API
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: std::env::var("COINGECKO_API")
                .unwrap_or_else(|_| "https://api.coingecko.com".to_string()),
        }
    }

    /// Circulating supply for a coin id, zero when the response carries none
    pub async fn circulating_supply(&self, coin_id: &str) -> Result<BigDecimal> {
        let url = format!("{}/api/v3/coins/{}", self.base_url, coin_id);
        let body: CoinResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("invalid response from {}", url))?;

        let raw = body.market_data.and_then(|m| m.circulating_supply);
        Ok(supply_or_zero(raw.as_ref()))
    }
}

impl Default for GeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Refresh one network's ibc_tokens_total_supply field and rewrite its config
/// file. A failing lookup for a single denom is logged and skipped; returns
/// the number of entries written.
pub async fn refresh_network(
    chain: &ChainClient,
    gecko: &GeckoClient,
    store: &ConfigStore,
) -> Result<usize> {
    let network = chain.network();

    let gas_prices = chain.min_gas_prices().await?;
    let ibc_denoms: Vec<String> = gas_prices
        .into_iter()
        .map(|price| price.denom)
        .filter(|denom| is_ibc_denom(denom))
        .collect();

    let decimals: HashMap<String, u32> = chain
        .tokens()
        .await?
        .into_iter()
        .map(|token| (token.denom, token.decimals))
        .collect();

    let mut total_supply = Vec::new();
    for denom in &ibc_denoms {
        if SKIP_SUPPLY.contains(&denom.as_str()) {
            continue;
        }
        let coin_id = match gecko_id(denom) {
            Some(id) => id,
            None => continue,
        };

        // One bad lookup must not abort the rest of the network's refresh
        let supply = match gecko.circulating_supply(coin_id).await {
            Ok(supply) => supply,
            Err(e) => {
                tracing::warn!("skipping {} on {}: {:#}", denom, network, e);
                continue;
            }
        };

        let token_decimals = decimals.get(denom).copied().unwrap_or(0);
        total_supply.push(TotalSupplyEntry {
            denom: denom.clone(),
            amount: scale_amount(&supply, token_decimals),
        });
    }

    let written = total_supply.len();

    let mut config = match store.load(network) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; rewriting {} config from scratch", e, network);
            NetworkConfig {
                network: network.to_string(),
                ..Default::default()
            }
        }
    };
    config.ibc_tokens_total_supply = total_supply;
    store.save(network, &config)?;

    Ok(written)
}
