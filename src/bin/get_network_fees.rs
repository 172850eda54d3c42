//! Dump the minimum gas prices configured on a network
//!
//! Run with: cargo run --bin get-network-fees -- mainnet

use anyhow::Result;
use clap::Parser;

use demex_config_validator::chain::{ChainClient, Network};

#[derive(Parser)]
#[command(name = "get-network-fees")]
#[command(about = "List every fee denom and its minimum gas price on a network")]
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
    for price in client.min_gas_prices().await? {
        println!("{} {}", price.denom, price.gas_price);
    }

    Ok(())
}
