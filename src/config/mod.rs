//! Per-network config documents
//!
//! One JSON document per network under the configs directory, maintained by
//! hand and validated against chain state before shipping. Fields this tool
//! does not model are preserved verbatim across a load/save round trip.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::chain::Network;
use crate::types::{ConfigError, ConfigResult};

/// A network's config document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub network: String,

    #[serde(default)]
    pub prelaunch_markets: Vec<String>,

    #[serde(default)]
    pub blacklisted_markets: Vec<String>,

    #[serde(default)]
    pub blacklisted_pools: Vec<String>,

    #[serde(default)]
    pub blacklisted_tokens: Vec<String>,

    /// External transfer settings keyed by bridge chain name
    #[serde(default)]
    pub transfer_options: BTreeMap<String, i64>,

    /// Fee multiplier keyed by accepted fee denom
    #[serde(default)]
    pub network_fees: BTreeMap<String, f64>,

    #[serde(default)]
    pub perp_pool_banners: Vec<PerpPoolBanner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demex_points_config: Option<DemexPointsConfig>,

    /// Active promos keyed by perp pool id
    #[serde(default)]
    pub perp_pool_promo: BTreeMap<String, PerpPoolPromo>,

    /// Derived field, rewritten wholesale by the supply refresher
    #[serde(default)]
    pub ibc_tokens_total_supply: Vec<TotalSupplyEntry>,

    /// Anything else in the document passes through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerpPoolBanner {
    pub perp_pool_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_markets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_markets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemexPointsConfig {
    pub deposits_per_spin: i64,
    pub trading_volume_per_spin: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerpPoolPromo {
    pub start: String,
    pub end: String,
    pub perp_pool_deposit_boost: String,
    pub perp_trading_boost: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSupplyEntry {
    pub denom: String,
    pub amount: String,
}

/// Loads and saves per-network config documents
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a network's config file
    pub fn path(&self, network: Network) -> PathBuf {
        self.dir.join(format!("{}.json", network))
    }

    /// Read and parse a network's config. A parse failure is reported as a
    /// validation failure for that network, not a crash.
    pub fn load(&self, network: Network) -> ConfigResult<NetworkConfig> {
        let path = self.path(network);
        let data = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: display_path(&path),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: display_path(&path),
            source,
        })
    }

    /// Rewrite a network's config wholesale, pretty-printed with the 4-space
    /// indent the maintained files use.
    pub fn save(&self, network: Network, config: &NetworkConfig) -> ConfigResult<()> {
        let path = self.path(network);
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        config
            .serialize(&mut ser)
            .map_err(|source| ConfigError::Parse {
                path: display_path(&path),
                source,
            })?;
        buf.push(b'\n');
        std::fs::write(&path, buf).map_err(|source| ConfigError::Write {
            path: display_path(&path),
            source,
        })
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
