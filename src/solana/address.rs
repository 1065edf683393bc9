//! Base58 Solana addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::constants::PUBKEY_BYTES;
use crate::error::AppError;

/// A 32-byte Solana account address (wallet, mint, order account, program).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolanaAddress([u8; PUBKEY_BYTES]);

impl SolanaAddress {
    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Parse a named caller-supplied field, rejecting empty input with a field-specific message.
    pub fn parse_field(field: &str, value: &str) -> Result<Self, AppError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_param(format!("{field} cannot be empty")));
        }
        trimmed.parse().map_err(|e: AppError| match e {
            AppError::InvalidParameter(msg) => AppError::InvalidParameter(format!("{field}: {msg}")),
            other => other,
        })
    }
}

impl FromStr for SolanaAddress {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AppError::invalid_param(format!("invalid Solana address '{s}': {e}")))?;

        let bytes: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|b: Vec<u8>| {
            AppError::invalid_param(format!(
                "invalid Solana address '{s}': expected {PUBKEY_BYTES} bytes, got {}",
                b.len()
            ))
        })?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for SolanaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for SolanaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SolanaAddress({self})")
    }
}

impl AsRef<[u8]> for SolanaAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for SolanaAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
