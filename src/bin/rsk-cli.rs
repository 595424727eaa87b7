use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use rootstock_kit::config::{load_config, SdkConfig, WalletConfig};
use rootstock_kit::observability::logging;
use rootstock_kit::wallet::{JsonRpcWalletProvider, SignatureManager};
use rootstock_kit::{Network, RpcManager};

#[derive(Parser)]
#[command(name = "rsk-cli")]
#[command(about = "Inspect Rootstock RPC endpoints and drive a JSON-RPC wallet", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every endpoint once and print health plus the best URL
    Probe {
        /// Only probe this network
        #[arg(short, long)]
        network: Option<Network>,
    },
    /// Query the chain height through the best endpoint
    BlockNumber {
        #[arg(short, long, default_value = "testnet")]
        network: Network,
    },
    /// Native or ERC-20 balance of an address
    Balance {
        #[arg(short, long, default_value = "testnet")]
        network: Network,
        /// ERC-20 contract; native RBTC when omitted
        #[arg(short, long)]
        token: Option<Address>,
        address: Address,
    },
    /// Send ERC-20 tokens through a JSON-RPC wallet
    Transfer {
        #[arg(short, long)]
        wallet_url: String,
        #[arg(short, long)]
        token: Address,
        /// Decimal amount, converted with the token's decimals
        #[arg(short, long)]
        amount: String,
        to: Address,
    },
    /// Ask a JSON-RPC wallet to sign a message
    SignMessage {
        /// Wallet JSON-RPC URL
        #[arg(short, long)]
        wallet_url: String,
        /// Sign the raw UTF-8 bytes instead of the string form
        #[arg(long)]
        personal: bool,
        message: String,
    },
    /// Ask a JSON-RPC wallet to switch network
    Switch {
        #[arg(short, long)]
        wallet_url: String,
        #[arg(short, long)]
        network: Network,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SdkConfig::default(),
    };

    match cli.command {
        Commands::Probe { network } => {
            let manager = RpcManager::new(config.rpc)?;
            let networks = match network {
                Some(n) => vec![n],
                None => Network::ALL.to_vec(),
            };

            let mut report = serde_json::Map::new();
            for network in networks {
                manager.probe(network).await;
                let mut endpoints = manager.health_snapshot(network);
                endpoints.sort_by(|a, b| a.url.cmp(&b.url));
                report.insert(
                    network.to_string(),
                    json!({
                        "bestUrl": manager.best_url(network),
                        "endpoints": endpoints,
                    }),
                );
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::BlockNumber { network } => {
            let manager = RpcManager::new(config.rpc)?;
            manager.probe(network).await;
            let client = manager.create_client(network)?;
            client.verify_chain_id().await?;
            let block = client.get_block_number().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "network": network,
                    "url": client.url(),
                    "blockNumber": block,
                }))?
            );
        }
        Commands::Balance {
            network,
            token,
            address,
        } => {
            let manager = RpcManager::new(config.rpc)?;
            manager.probe(network).await;
            let client = manager.create_client(network)?;
            client.verify_chain_id().await?;
            let report = match token {
                Some(token) => json!({
                    "network": network,
                    "token": token,
                    "address": address,
                    "balance": client.formatted_token_balance(token, address).await?,
                }),
                None => json!({
                    "network": network,
                    "address": address,
                    "balanceWei": client.get_balance(address).await?.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Transfer {
            wallet_url,
            token,
            amount,
            to,
        } => {
            let network = config.wallet.target_network;
            let manager = RpcManager::new(config.rpc)?;
            manager.probe(network).await;
            let units = manager
                .create_client(network)?
                .parse_token_amount(token, &amount)
                .await?;
            let signer = wallet(&wallet_url, config.wallet);
            let result = signer.transfer_erc20(token, to, units).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::SignMessage {
            wallet_url,
            personal,
            message,
        } => {
            let signer = wallet(&wallet_url, config.wallet);
            let result = if personal {
                signer.request_personal_signature(&message).await
            } else {
                signer.request_message_signature(&message).await
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Switch {
            wallet_url,
            network,
        } => {
            let signer = wallet(&wallet_url, config.wallet);
            let switched = signer.switch_network(network).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "network": network, "switched": switched }))?
            );
        }
    }

    Ok(())
}

fn wallet(url: &str, config: WalletConfig) -> SignatureManager {
    SignatureManager::new(Arc::new(JsonRpcWalletProvider::new(url)), config)
}
