//! Chain query layer
//!
//! Read-only REST client for the per-network Carbon query endpoints.
//! Handles:
//! - Network selection and endpoint resolution (env-overridable)
//! - Connection probing so an unreachable network is caught once, up front
//! - Full-drain pagination over the reference data queries

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

pub mod queries;

pub use queries::{Bridge, Market, MinGasPrice, PerpPool, Token};

/// Page size for reference data queries. Queries keep advancing the offset
/// until a page comes back shorter than this.
pub const PAGE_LIMIT: usize = 1000;

/// Network identifier for the supported deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localhost,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localhost => "localhost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            "devnet" => Some(Network::Devnet),
            "localhost" => Some(Network::Localhost),
            _ => None,
        }
    }

    pub fn all() -> &'static [Network] {
        &[
            Network::Mainnet,
            Network::Testnet,
            Network::Devnet,
            Network::Localhost,
        ]
    }

    /// REST endpoint for this network. The default can be overridden with
    /// CARBON_API_<NETWORK> (loaded from .env at startup).
    pub fn rest_url(&self) -> String {
        let default = match self {
            Network::Mainnet => "https://api.carbon.network",
            Network::Testnet => "https://test-api.carbon.network",
            Network::Devnet => "https://dev-api.carbon.network",
            Network::Localhost => "http://localhost:1317",
        };
        std::env::var(self.env_key()).unwrap_or_else(|_| default.to_string())
    }

    fn env_key(&self) -> &'static str {
        match self {
            Network::Mainnet => "CARBON_API_MAINNET",
            Network::Testnet => "CARBON_API_TESTNET",
            Network::Devnet => "CARBON_API_DEVNET",
            Network::Localhost => "CARBON_API_LOCALHOST",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A paginated REST response carrying one category of records
pub trait Page {
    type Item;

    fn items(self) -> Vec<Self::Item>;
}

/// Read-only query client for a single network
pub struct ChainClient {
    network: Network,
    base_url: String,
    http: reqwest::Client,
}

impl ChainClient {
    /// Connect to a network's query endpoint. Probes the node info route so
    /// an unreachable chain surfaces here rather than midway through a batch
    /// of queries.
    pub async fn connect(network: Network) -> Result<Self> {
        let client = Self {
            network,
            base_url: network.rest_url(),
            http: reqwest::Client::new(),
        };

        let probe = format!(
            "{}/cosmos/base/tendermint/v1beta1/node_info",
            client.base_url
        );
        client
            .http
            .get(&probe)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .with_context(|| {
                format!(
                    "failed to reach {} query endpoint at {}",
                    network, client.base_url
                )
            })?;

        tracing::debug!("connected to {} at {}", network, client.base_url);
        Ok(client)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Fetch every record behind a paginated route by draining pages until a
    /// short page is returned.
    pub(crate) async fn drain<P>(&self, path: &str) -> Result<Vec<P::Item>>
    where
        P: Page + DeserializeOwned,
    {
        let base = self.base_url.clone();
        let http = self.http.clone();
        let path = path.to_string();

        drain_pages(PAGE_LIMIT, move |offset| {
            let url = format!(
                "{}{}?pagination.limit={}&pagination.offset={}",
                base, path, PAGE_LIMIT, offset
            );
            let http = http.clone();
            async move {
                let page: P = http
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await
                    .with_context(|| format!("invalid response from {}", url))?;
                Ok(page.items())
            }
        })
        .await
    }
}

/// Drain a paginated source by advancing the offset until a page shorter than
/// `limit` is returned. The offset passed to `fetch_page` is the number of
/// items collected so far.
pub(crate) async fn drain_pages<T, F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items: Vec<T> = Vec::new();
    loop {
        let page = fetch_page(items.len()).await?;
        let page_len = page.len();
        items.extend(page);
        if page_len < limit {
            break;
        }
    }
    Ok(items)
}
