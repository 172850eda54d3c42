//! Dump the perp pool ids registered on a network
//!
//! Run with: cargo run --bin get-perp-pool-ids -- mainnet

use anyhow::Result;
use clap::Parser;

use demex_config_validator::chain::{ChainClient, Network};

#[derive(Parser)]
#[command(name = "get-perp-pool-ids")]
#[command(about = "List every perp pool id on a network")]
struct Args {
    /// Network to query (mainnet, testnet, devnet, localhost)
    network: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let args = Args::parse();
    let network = match Network::from_str(&args.network) {
        Some(network) => network,
        None => {
            eprintln!("ERROR: Invalid network keyed: {}", args.network);
            std::process::exit(1);
        }
    };

    let client = ChainClient::connect(network).await?;
    for pool_id in client.perp_pool_ids().await? {
        println!("{}", pool_id);
    }

    Ok(())
}
