use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evm_transfer::{Config, TransferArgs, TransferOrchestrator, TransferOutcome};

/// Send native currency or ERC20 tokens through an external signing service
#[derive(Parser, Debug)]
#[command(name = "evm_transfer", version, about)]
struct Cli {
    /// Chain ID
    #[arg(long)]
    chain_id: u64,

    /// Sender address (must be known to the signer)
    #[arg(long = "from")]
    from_addr: String,

    /// Recipient address
    #[arg(long)]
    to: String,

    /// Value in wei (native transfer)
    #[arg(long, default_value = "0")]
    value: String,

    /// ERC20 token contract address (switches to a token transfer)
    #[arg(long)]
    token: Option<String>,

    /// Token amount in smallest unit (required with --token)
    #[arg(long)]
    amount: Option<String>,

    /// Transaction nonce (fetched if not specified)
    #[arg(long)]
    nonce: Option<u64>,

    /// Gas limit (estimated +10% if not specified)
    #[arg(long)]
    gas_limit: Option<u64>,

    /// Gas price in wei (fetched if not specified)
    #[arg(long)]
    gas_price: Option<u128>,

    /// Only sign, don't broadcast
    #[arg(long)]
    dry_run: bool,

    /// Ping the signer before doing anything else
    #[arg(long)]
    check_signer: bool,

    /// Configuration file path
    #[arg(short, long, env = "EVM_TRANSFER_CONFIG")]
    config: Option<PathBuf>,

    /// Signer base URL, overrides the config file
    #[arg(long, env = "EVM_SIGNER_URL")]
    signer_url: Option<String>,
}

impl Cli {
    fn transfer_args(&self) -> TransferArgs {
        TransferArgs {
            chain_id: self.chain_id,
            from: self.from_addr.clone(),
            to: self.to.clone(),
            value: self.value.clone(),
            token: self.token.clone(),
            amount: self.amount.clone(),
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            dry_run: self.dry_run,
            check_signer: self.check_signer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the transfer report, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evm_transfer=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::discover(cli.config.as_deref())?;
    if let Some(url) = &cli.signer_url {
        config.signer.base_url = url.clone();
    }

    let orchestrator = TransferOrchestrator::from_config(&config)
        .context("failed to set up HTTP clients")?;

    match orchestrator.run(&cli.transfer_args()).await? {
        TransferOutcome::Signed { raw_tx } => {
            println!("\n[Dry run] Transaction signed but not broadcast");
            println!("Full raw transaction: {}", raw_tx);
        }
        TransferOutcome::Broadcast { tx_hash, .. } => {
            println!("Transaction hash: {}", tx_hash);
        }
    }

    Ok(())
}
