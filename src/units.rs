//! Conversions between display amounts, smallest units and JSON-RPC hex quantities
//!
//! Display amounts are `f64`, so every conversion is exact only within `f64`
//! precision (about 15-17 significant digits). Amounts are an approximation,
//! never a guarantee of wei-exactness.

use crate::error::{ProviderError, Result, WalletError};

const ADDRESS_BYTES: usize = 20;

/// Convert a display amount into the chain's smallest unit
pub fn to_smallest_unit(amount: f64, decimals: u8) -> Result<u128> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(WalletError::InvalidAmount(amount));
    }

    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    if scaled >= u128::MAX as f64 {
        return Err(WalletError::InvalidAmount(amount));
    }

    Ok(scaled as u128)
}

/// Convert a smallest-unit value back into a display amount
pub fn from_smallest_unit(value: u128, decimals: u8) -> f64 {
    value as f64 / 10f64.powi(decimals as i32)
}

/// Encode a value as a JSON-RPC quantity (`0x`-prefixed, no leading zeros)
pub fn to_hex_quantity(value: u128) -> String {
    format!("{:#x}", value)
}

/// Parse a JSON-RPC quantity such as `"0x8ac7230489e80000"`
pub fn parse_hex_quantity(quantity: &str) -> std::result::Result<u128, ProviderError> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| ProviderError::Malformed(format!("not a hex quantity: {}", quantity)))?;

    if digits.is_empty() {
        return Ok(0);
    }

    u128::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::Malformed(format!("bad hex quantity {}: {}", quantity, e)))
}

/// Validate a `0x`-prefixed 20-byte address and return it lowercased
pub fn normalize_address(address: &str) -> Option<String> {
    let digits = address.strip_prefix("0x").or_else(|| address.strip_prefix("0X"))?;
    let bytes = hex::decode(digits).ok()?;
    if bytes.len() != ADDRESS_BYTES {
        return None;
    }

    Some(format!("0x{}", hex::encode(bytes)))
}
