//! Config validation gate
//!
//! One-shot batch validator: for each network named on the command line, load
//! its config document, query the chain's reference data, run every
//! consistency check, and report the complete set of violations. Exits 0 only
//! when every requested network passes.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demex_config_validator::chain::{ChainClient, Network};
use demex_config_validator::config::ConfigStore;
use demex_config_validator::outcome::OutcomeMap;
use demex_config_validator::validation::{validate_config, PromoScan, ReferenceData};

#[derive(Parser)]
#[command(name = "check-configs")]
#[command(about = "Validate per-network config files against chain state")]
struct Args {
    /// Networks to validate (mainnet, testnet, devnet, localhost)
    #[arg(required = true)]
    networks: Vec<String>,

    /// Directory holding the per-network config files
    #[arg(long, default_value = "configs")]
    config_dir: String,

    /// Report every promo time-order violation instead of stopping at the first
    #[arg(long)]
    exhaustive_promos: bool,
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

    // An unrecognized network name is fatal before any network is processed
    let mut networks = Vec::new();
    for name in &args.networks {
        match Network::from_str(name) {
            Some(network) => networks.push(network),
            None => {
                tracing::error!("ERROR: Invalid network keyed: {}", name);
                std::process::exit(1);
            }
        }
    }

    let store = ConfigStore::new(&args.config_dir);
    let promo_scan = if args.exhaustive_promos {
        PromoScan::Exhaustive
    } else {
        PromoScan::FailFast
    };

    let mut outcomes = OutcomeMap::new(networks.iter().copied());

    for network in networks {
        if let Err(e) = check_network(network, &store, promo_scan, &mut outcomes).await {
            // A network whose chain queries fail cannot be verified, so it
            // must not pass the gate
            tracing::error!("ERROR: {} could not be validated: {:#}", network, e);
            outcomes.mark_failure(network);
        }
    }

    if outcomes.all_passed() {
        tracing::info!("Success!");
        tracing::info!("Configs has passed all checks!");
    } else {
        tracing::error!("Error!");
        tracing::error!("Please check the error message(s) above to correct the errors.");
        std::process::exit(1);
    }
}

/// Validate a single network's config document. Validation findings flip the
/// outcome flag and never error; only config/chain plumbing failures return
/// Err.
async fn check_network(
    network: Network,
    store: &ConfigStore,
    promo_scan: PromoScan,
    outcomes: &mut OutcomeMap,
) -> anyhow::Result<()> {
    let config = match store.load(network) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("ERROR: {}", e);
            outcomes.mark_failure(network);
            return Ok(());
        }
    };

    let client = ChainClient::connect(network).await?;

    let refs = ReferenceData {
        markets: client.market_names().await?,
        pools: client.pool_ids().await?,
        tokens: client.token_denoms().await?,
        bridge_chains: client.bridge_chain_names().await?,
        fee_denoms: client.fee_denoms().await?,
        perp_pool_ids: client.perp_pool_ids().await?,
    };

    let violations = validate_config(network, &config, &refs, promo_scan);
    for violation in &violations {
        tracing::error!("ERROR: {}", violation);
        outcomes.mark_failure(network);
    }

    Ok(())
}
