/// ERC20 `transfer(address,uint256)` call data
/// Layout: selector (4 bytes) || address word (32 bytes) || amount word (32 bytes)

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use std::str::FromStr;

use crate::chain::quantity::strip_hex_prefix;
use crate::error::{Result, TransferError};

sol! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// First 4 bytes of keccak256("transfer(address,uint256)")
pub const ERC20_TRANSFER_SELECTOR: &str = "0xa9059cbb";

/// 20-byte address as hex digits
const ADDRESS_HEX_LEN: usize = 40;

/// Encode `transfer(to, amount)` as `0x`-prefixed lowercase hex.
///
/// Addresses shorter than 20 bytes are left-padded with zeros. An empty
/// address is rejected rather than encoded as the zero address.
pub fn encode_transfer(to: &str, amount: U256) -> Result<String> {
    let call = IERC20::transferCall {
        to: parse_recipient(to)?,
        amount,
    };
    Ok(format!("0x{}", hex::encode(call.abi_encode())))
}

fn parse_recipient(to: &str) -> Result<Address> {
    let digits = strip_hex_prefix(to.trim());

    if digits.is_empty() {
        return Err(TransferError::Encoding(format!(
            "recipient address {:?} is empty",
            to
        )));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TransferError::Encoding(format!(
            "recipient address {} is not hex",
            to
        )));
    }
    if digits.len() > ADDRESS_HEX_LEN {
        return Err(TransferError::Encoding(format!(
            "recipient address {} is longer than 20 bytes",
            to
        )));
    }

    let padded = format!("{:0>width$}", digits, width = ADDRESS_HEX_LEN);
    Address::from_str(&padded)
        .map_err(|e| TransferError::Encoding(format!("recipient address {}: {}", to, e)))
}
