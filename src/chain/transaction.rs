/// Transfer intent and the transaction assembled from it
/// A draft holds the non-gas fields; it becomes an `UnsignedTransaction` once
/// nonce, gas price and gas limit are known.

use alloy_primitives::U256;
use serde::Serialize;

use crate::chain::erc20::encode_transfer;
use crate::chain::quantity::{parse_decimal_u256, u128_to_quantity, u256_to_quantity};
use crate::error::{Result, TransferError};

/// Call data for a plain value transfer
pub const EMPTY_DATA: &str = "0x";

/// Percent added on top of `eth_estimateGas`
pub const GAS_BUFFER_PERCENT: u64 = 10;

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferRequest {
    /// Move native currency directly to `to`
    Native { to: String, value: U256 },
    /// Call `transfer(to, amount)` on the `token` contract
    Token { token: String, to: String, amount: U256 },
}

impl TransferRequest {
    /// Build the request from raw CLI values.
    ///
    /// `token` selects the ERC20 path and then `amount` is mandatory.
    /// This check runs before anything touches the network.
    pub fn from_cli(
        to: &str,
        value: &str,
        token: Option<&str>,
        amount: Option<&str>,
    ) -> Result<Self> {
        match token {
            Some(token) => {
                let amount = amount.ok_or_else(|| {
                    TransferError::Argument("--amount is required for ERC20 transfers".to_string())
                })?;
                let value = parse_decimal_u256(value)?;
                if !value.is_zero() {
                    tracing::warn!("--value {} ignored for ERC20 transfer", value);
                }
                Ok(TransferRequest::Token {
                    token: token.to_string(),
                    to: to.to_string(),
                    amount: parse_decimal_u256(amount)?,
                })
            }
            None => {
                if amount.is_some() {
                    tracing::warn!("--amount ignored without --token");
                }
                Ok(TransferRequest::Native {
                    to: to.to_string(),
                    value: parse_decimal_u256(value)?,
                })
            }
        }
    }

    /// Recipient of the funds (not the contract for token transfers)
    pub fn recipient(&self) -> &str {
        match self {
            TransferRequest::Native { to, .. } => to,
            TransferRequest::Token { to, .. } => to,
        }
    }
}

/// Non-gas fields of the transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxDraft {
    pub from: String,
    pub to: String,
    pub value: U256,
    pub data: String,
}

impl TxDraft {
    pub fn build(from: &str, request: &TransferRequest) -> Result<Self> {
        let draft = match request {
            TransferRequest::Native { to, value } => Self {
                from: from.to_string(),
                to: to.clone(),
                value: *value,
                data: EMPTY_DATA.to_string(),
            },
            // Tokens move by calling the contract, no native value attached
            TransferRequest::Token { token, to, amount } => Self {
                from: from.to_string(),
                to: token.clone(),
                value: U256::ZERO,
                data: encode_transfer(to, *amount)?,
            },
        };
        Ok(draft)
    }

    /// Payload for `eth_estimateGas`. `gas` is left out since it is the unknown.
    pub fn estimate_request(&self, nonce: u64, gas_price: u128) -> GasEstimateRequest {
        GasEstimateRequest {
            from: self.from.clone(),
            to: self.to.clone(),
            value: u256_to_quantity(self.value),
            data: self.data.clone(),
            nonce: u128_to_quantity(nonce as u128),
            gas_price: u128_to_quantity(gas_price),
        }
    }

    pub fn finalize(self, nonce: u64, gas_price: u128, gas: u64) -> UnsignedTransaction {
        UnsignedTransaction {
            from: self.from,
            to: self.to,
            value: self.value,
            data: self.data,
            nonce,
            gas_price,
            gas,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimateRequest {
    pub from: String,
    pub to: String,
    pub value: String,
    pub data: String,
    pub nonce: String,
    pub gas_price: String,
}

/// Fully resolved transaction, ready for the signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub from: String,
    pub to: String,
    pub value: U256,
    pub data: String,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas: u64,
}

/// `ceil(estimate * 1.1)`, computed in integers
pub fn apply_gas_buffer(estimate: u64) -> u64 {
    let scaled = estimate as u128 * (100 + GAS_BUFFER_PERCENT) as u128;
    let buffered = (scaled + 99) / 100;
    u64::try_from(buffered).unwrap_or(u64::MAX)
}
