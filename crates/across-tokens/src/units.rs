//! Human-readable amount -> smallest-unit integer conversion.

use across_types::{BridgeError, Result};

/// Decimals used when scaling an amount of `symbol`.
///
/// ETH/WETH use 18, USDC/USDT use 6, anything else defaults to 18.
pub fn decimals_for(symbol: &str) -> u32 {
    match symbol.to_uppercase().as_str() {
        "USDC" | "USDT" => 6,
        _ => 18,
    }
}

/// Convert a decimal amount (e.g. "5.0") into the token's smallest unit.
///
/// Digits beyond the token's precision are truncated, never rounded:
/// `to_smallest_unit("0.0000001", "USDC")` is `"0"`.
pub fn to_smallest_unit(amount: &str, symbol: &str) -> Result<String> {
    scale_decimal(amount, decimals_for(symbol)).map(|v| v.to_string())
}

fn scale_decimal(amount: &str, decimals: u32) -> Result<u128> {
    let invalid = || BridgeError::InvalidAmount(amount.to_string());

    let trimmed = amount.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let scale = 10u128.checked_pow(decimals).ok_or_else(invalid)?;
    let whole_val = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| invalid())?
    };

    // Keep only as many fractional digits as the token has, then right-pad.
    let kept: String = frac.chars().take(decimals as usize).collect();
    let frac_val = if kept.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", kept, width = decimals as usize);
        padded.parse::<u128>().map_err(|_| invalid())?
    };

    whole_val
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(invalid)
}
