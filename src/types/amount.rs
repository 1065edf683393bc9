//! Token amount helpers.
//!
//! Amounts travel as integer strings in base units (lamports for SOL,
//! 10^-decimals of a token otherwise).

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Parse a positive integer amount in base units.
pub fn parse_base_units(field: &str, amount: &str) -> Result<u64> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(AppError::invalid_param(format!("{field} cannot be empty")));
    }

    if amount.starts_with('-') {
        return Err(AppError::invalid_param(format!("{field} cannot be negative")));
    }

    let value = amount.parse::<u64>().map_err(|e| {
        AppError::invalid_param(format!(
            "{field} must be an integer amount in base units, got '{amount}': {e}"
        ))
    })?;

    if value == 0 {
        return Err(AppError::invalid_param(format!("{field} must be greater than zero")));
    }

    Ok(value)
}

/// Scale a base-unit amount to whole tokens. `None` if `decimals` is out of range.
pub fn to_decimal(amount: u64, decimals: u8) -> Option<Decimal> {
    Decimal::try_from_i128_with_scale(i128::from(amount), u32::from(decimals)).ok()
}

/// Accept an amount encoded as either a JSON string or a JSON number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
    }
}

/// Like [`string_or_number`], but `null` and missing map to `None`.
pub(crate) fn opt_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => {
            Err(serde::de::Error::custom(format!("expected string or number, got {other}")))
        }
    }
}
