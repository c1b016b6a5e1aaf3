/// Hex quantity marshaling for the JSON-RPC and signer wire formats.
/// Everything inside the crate is a plain integer; `0x` strings exist only here.

use alloy_primitives::U256;

use crate::error::{Result, TransferError};

/// `0x`-prefixed minimal hex, `0x0` for zero
pub fn u256_to_quantity(value: U256) -> String {
    let encoded = hex::encode(value.to_be_bytes::<32>());
    let trimmed = encoded.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

pub fn u128_to_quantity(value: u128) -> String {
    format!("{:#x}", value)
}

/// Parse a hex quantity such as `0x1a`. Returns `None` on anything malformed.
pub fn parse_quantity(value: &str) -> Option<u128> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

/// Strip an optional `0x`/`0X` prefix
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Parse a decimal wei or token amount into 256 bits.
/// Digits that do not fit are an encoding failure, never truncated.
pub fn parse_decimal_u256(value: &str) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(TransferError::Argument(format!(
            "amount {:?} is not a non-negative decimal integer",
            value
        )));
    }
    U256::from_str_radix(value, 10).map_err(|_| {
        TransferError::Encoding(format!("amount {} does not fit in 256 bits", value))
    })
}
