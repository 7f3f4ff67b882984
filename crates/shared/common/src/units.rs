//! Conversions between human readable amounts and fixed-point integers.
//!
//! Every denomination is a number of decimal places. Amounts are accepted as
//! anything that renders as a plain decimal number (`1`, `"1.5"`, `0.25f64`)
//! and are scaled exactly: an amount that cannot be represented at the
//! denomination's precision is rejected instead of truncated.

use std::fmt;

use alloy_primitives::{
    U256,
    utils::{ParseUnits, format_units, parse_units},
};

use crate::UnitsError;

/// Decimal places of ether.
pub const ETHER_DECIMALS: u8 = 18;

/// Decimal places of gwei.
pub const GWEI_DECIMALS: u8 = 9;

/// Decimal places used by wrapped bitcoin tokens.
pub const BITCOIN_DECIMALS: u8 = 8;

/// Decimal places of USDC.
pub const USDC_DECIMALS: u8 = 6;

/// Largest number of decimals a 256-bit fixed-point value can carry.
const MAX_DECIMALS: u8 = 77;

/// Converts an amount of ether to wei.
pub fn ether(amount: impl fmt::Display) -> Result<U256, UnitsError> {
    parse_amount(amount, ETHER_DECIMALS)
}

/// Converts an amount of gwei to wei.
pub fn gwei(amount: impl fmt::Display) -> Result<U256, UnitsError> {
    parse_amount(amount, GWEI_DECIMALS)
}

/// Converts an amount of bitcoin to satoshi.
pub fn bitcoin(amount: impl fmt::Display) -> Result<U256, UnitsError> {
    parse_amount(amount, BITCOIN_DECIMALS)
}

/// Converts an amount of USDC to its 6 decimal base unit.
pub fn usdc(amount: impl fmt::Display) -> Result<U256, UnitsError> {
    parse_amount(amount, USDC_DECIMALS)
}

/// Scales `amount` by `10^decimals`.
///
/// Trailing fractional zeros are ignored, so `"1.50"` and `"1.5"` scale to the
/// same value. A leading `+` is accepted; any sign of negativity is not.
pub fn parse_amount(amount: impl fmt::Display, decimals: u8) -> Result<U256, UnitsError> {
    let raw = amount.to_string();
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::TooPrecise { amount: raw, decimals });
    }

    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return Err(UnitsError::Negative(raw));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::Malformed(raw));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooPrecise { amount: raw, decimals });
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized =
        if fraction.is_empty() { whole.to_string() } else { format!("{whole}.{fraction}") };

    match parse_units(&normalized, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(UnitsError::Negative(raw)),
        Err(_) => Err(UnitsError::Overflow(raw)),
    }
}

/// Renders a scaled integer as a decimal string without trailing zeros.
pub fn format_amount(value: U256, decimals: u8) -> Result<String, UnitsError> {
    let formatted = format_units(value, decimals).map_err(|_| UnitsError::TooPrecise {
        amount: value.to_string(),
        decimals,
    })?;

    Ok(match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() { whole.to_string() } else { format!("{whole}.{fraction}") }
        }
        None => formatted,
    })
}
