//! Wallet management.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey};

use super::{
    address::SolanaAddress,
    constants::{KEYPAIR_BYTES, SIGNATURE_BYTES},
};
use crate::error::{AppError, Result};

/// Wallet manager for transaction signing.
///
/// Owns the secret key for the lifetime of the process; only the address leaves it.
#[derive(Clone)]
pub struct WalletManager {
    /// The ed25519 signing key.
    signing_key: SigningKey,
    /// Wallet address (public half of the keypair).
    address: SolanaAddress,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    ///
    /// Accepts the usual base58-encoded 64-byte Solana keypair. A base64 encoding of the
    /// same 64 bytes is accepted as a fallback.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        if key.is_empty() {
            return Err(AppError::InvalidKey("private key is empty".into()));
        }

        let bytes = match bs58::decode(key).into_vec() {
            Ok(bytes) => bytes,
            Err(b58_err) => BASE64_STANDARD.decode(key).map_err(|_| {
                AppError::InvalidKey(format!("private key is neither base58 nor base64: {b58_err}"))
            })?,
        };

        let keypair: [u8; KEYPAIR_BYTES] = bytes.try_into().map_err(|b: Vec<u8>| {
            AppError::InvalidKey(format!("expected a {KEYPAIR_BYTES}-byte keypair, got {} bytes", b.len()))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(&keypair)
            .map_err(|e| AppError::InvalidKey(format!("keypair halves do not match: {e}")))?;

        let address = SolanaAddress::new(signing_key.verifying_key().to_bytes());

        Ok(Self { signing_key, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> SolanaAddress {
        self.address
    }

    /// Sign a serialized transaction message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_BYTES] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
