/// Transfer Orchestrator - runs one transfer from CLI input to broadcast
///
/// Pipeline, strictly in order:
/// 1. Validate arguments (no network before this passes)
/// 2. Resolve the chain's RPC endpoint
/// 3. Build the native or ERC20 draft
/// 4. Nonce, gas price, gas limit (override or fetched)
/// 5. Sign via the signer service
/// 6. Broadcast, unless dry run
///
/// Any error aborts the run. Nothing is retried.

use std::time::Duration;
use tracing::{debug, info};

use crate::chain::{
    apply_gas_buffer, ChainRegistry, RpcClient, SignerClient, TransferRequest, TxDraft,
    GAS_BUFFER_PERCENT, PING_PATH,
};
use crate::config::Config;
use crate::error::{Result, TransferError};

/// Everything the user supplied for one run
#[derive(Debug, Clone, Default)]
pub struct TransferArgs {
    pub chain_id: u64,
    pub from: String,
    pub to: String,
    /// Wei, decimal
    pub value: String,
    pub token: Option<String>,
    /// Token base units, decimal
    pub amount: Option<String>,
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub dry_run: bool,
    /// Ping the signer before any RPC call
    pub check_signer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Dry run: signed, not sent
    Signed { raw_tx: String },
    Broadcast { raw_tx: String, tx_hash: String },
}

pub struct TransferOrchestrator {
    registry: ChainRegistry,
    signer: SignerClient,
    rpc_timeout: Duration,
}

impl TransferOrchestrator {
    pub fn new(registry: ChainRegistry, signer: SignerClient, rpc_timeout: Duration) -> Self {
        Self {
            registry,
            signer,
            rpc_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = ChainRegistry::with_overrides(&config.chains);
        let signer = SignerClient::new(config.signer.base_url.clone(), config.signer.timeout())?;
        Ok(Self::new(registry, signer, config.rpc.timeout()))
    }

    pub async fn run(&self, args: &TransferArgs) -> Result<TransferOutcome> {
        let request = TransferRequest::from_cli(
            &args.to,
            &args.value,
            args.token.as_deref(),
            args.amount.as_deref(),
        )?;

        if args.check_signer && !self.signer.health_check().await {
            return Err(TransferError::transport(
                self.signer.base_url(),
                format!("signer did not answer {}", PING_PATH),
            ));
        }

        let rpc_url = self.registry.resolve(args.chain_id)?;
        println!("Using RPC: {}", rpc_url);
        let rpc = RpcClient::new(rpc_url, self.rpc_timeout)?;

        let draft = TxDraft::build(&args.from, &request)?;
        let recipient = request.recipient();
        match &request {
            TransferRequest::Native { value, .. } => {
                println!("Native transfer: {} wei to {}", value, recipient);
            }
            TransferRequest::Token { token, amount, .. } => {
                println!(
                    "ERC20 transfer: {} tokens to {} (contract {})",
                    amount, recipient, token
                );
            }
        }

        let nonce = match args.nonce {
            Some(nonce) => nonce,
            None => rpc.get_nonce(&args.from).await?,
        };
        println!("Nonce: {}", nonce);

        let gas_price = match args.gas_price {
            Some(price) => price,
            None => rpc.get_gas_price().await?,
        };
        println!("Gas price: {} wei", gas_price);

        let gas = match args.gas_limit {
            Some(limit) => limit,
            None => {
                let estimate = rpc
                    .estimate_gas(&draft.estimate_request(nonce, gas_price))
                    .await?;
                debug!("Gas estimate {} before {}% buffer", estimate, GAS_BUFFER_PERCENT);
                apply_gas_buffer(estimate)
            }
        };
        println!("Gas limit: {}", gas);

        let tx = draft.finalize(nonce, gas_price, gas);

        println!("\nSigning transaction...");
        let raw_tx = self.signer.sign(args.chain_id, &tx).await?;
        println!("Signed transaction: {}...", preview(&raw_tx));

        if args.dry_run {
            info!("Dry run, not broadcasting");
            return Ok(TransferOutcome::Signed { raw_tx });
        }

        println!("\nBroadcasting transaction...");
        let tx_hash = rpc.broadcast(&raw_tx).await?;
        info!("Broadcast accepted by {}", rpc.endpoint());

        Ok(TransferOutcome::Broadcast { raw_tx, tx_hash })
    }
}

/// First 66 characters of the raw transaction
fn preview(raw_tx: &str) -> &str {
    raw_tx.get(..66).unwrap_or(raw_tx)
}
