/// Error taxonomy for a single transfer run.
/// Every variant aborts the run; nothing is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    /// Missing or inconsistent CLI input, detected before any network call
    #[error("invalid arguments: {0}")]
    Argument(String),

    #[error("unknown chain ID: {chain_id}. Supported: {supported:?}")]
    UnknownChain { chain_id: u64, supported: Vec<u64> },

    /// Connection failure, timeout, or a non-2xx status without a usable body
    #[error("transport error ({url}): {message}")]
    Transport { url: String, message: String },

    /// Well-formed JSON-RPC error, or a response that is not a JSON-RPC envelope
    #[error("RPC error in {method}: {message}")]
    Rpc { method: String, message: String },

    #[error("signer error ({status}): {message}")]
    Signer { status: u16, message: String },

    /// Signer answered 2xx but the body is not what we expect
    #[error("unexpected response from signer: {0}")]
    UnexpectedResponse(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl TransferError {
    pub(crate) fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        TransferError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn rpc(method: &str, message: impl Into<String>) -> Self {
        TransferError::Rpc {
            method: method.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_chain_lists_supported() {
        let err = TransferError::UnknownChain {
            chain_id: 999,
            supported: vec![1, 10],
        };
        let msg = err.to_string();
        assert!(msg.contains("999"));
        assert!(msg.contains("[1, 10]"));
    }

    #[test]
    fn test_signer_error_carries_message() {
        let err = TransferError::Signer {
            status: 400,
            message: "insufficient funds".to_string(),
        };
        assert_eq!(err.to_string(), "signer error (400): insufficient funds");
    }
}
