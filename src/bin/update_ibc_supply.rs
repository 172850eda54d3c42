//! IBC supply refresher
//!
//! Run with: cargo run --bin update-ibc-supply
//!
//! Walks every deployed network, discovers the IBC denoms accepted for fee
//! payment, and rewrites each config's ibc_tokens_total_supply field from
//! CoinGecko circulating supply figures. A network whose query layer is
//! unreachable is skipped; a single failing denom lookup is skipped within
//! its network.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demex_config_validator::chain::{ChainClient, Network};
use demex_config_validator::config::ConfigStore;
use demex_config_validator::supply::{refresh_network, GeckoClient};

#[derive(Parser)]
#[command(name = "update-ibc-supply")]
#[command(about = "Refresh ibc_tokens_total_supply in every network config")]
struct Args {
    /// Directory holding the per-network config files
    #[arg(long, default_value = "configs")]
    config_dir: String,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let store = ConfigStore::new(&args.config_dir);
    let gecko = GeckoClient::new();

    for network in Network::all() {
        if *network == Network::Localhost {
            continue;
        }

        let chain = match ChainClient::connect(*network).await {
            Ok(chain) => chain,
            Err(e) => {
                tracing::error!("skipping {}: {:#}", network, e);
                continue;
            }
        };

        match refresh_network(&chain, &gecko, &store).await {
            Ok(written) => {
                tracing::info!("{}: wrote {} supply entries", network, written);
            }
            Err(e) => {
                tracing::error!("{}: supply refresh failed: {:#}", network, e);
            }
        }
    }
}
