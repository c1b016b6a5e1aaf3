pub mod erc20;
pub mod quantity;
pub mod registry;
pub mod rpc_client;
pub mod signer_client;
pub mod transaction;

pub use erc20::{encode_transfer, ERC20_TRANSFER_SELECTOR};
pub use registry::{ChainRegistry, DEFAULT_CHAINS};
pub use rpc_client::{JsonRpcRequest, RpcClient};
pub use signer_client::{
    SignRequest, SignResponse, SignerClient, SignerTransaction, PING_PATH, SIGN_TRANSACTION_PATH,
};
pub use transaction::{
    apply_gas_buffer, GasEstimateRequest, TransferRequest, TxDraft, UnsignedTransaction,
    GAS_BUFFER_PERCENT,
};
