// Library exports for evm_transfer

pub mod chain;
pub mod config;
pub mod error;
pub mod orchestrator;

// Re-export main types for convenience
pub use chain::{ChainRegistry, RpcClient, SignerClient, TransferRequest};
pub use config::Config;
pub use error::TransferError;
pub use orchestrator::{TransferArgs, TransferOrchestrator, TransferOutcome};
