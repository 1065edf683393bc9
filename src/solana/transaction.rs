//! Solana wire-format transactions.
//!
//! The aggregator hands out fully built, unsigned transactions. We only need
//! enough of the format to find the signature slots and the message bytes, so
//! the message is validated structurally and otherwise kept byte-for-byte.
//!
//! Layout:
//! `[compact-u16 n][n * 64-byte signatures][message]`, where a v0 message is
//! prefixed with `0x80` and ends with address-table lookups.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

use super::{
    address::SolanaAddress,
    constants::{PUBKEY_BYTES, SIGNATURE_BYTES},
    wallet::WalletManager,
};
use crate::error::{AppError, Result};

const VERSION_PREFIX_MASK: u8 = 0x80;
const BLOCKHASH_BYTES: usize = 32;

/// Message format of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVersion {
    Legacy,
    V0,
}

/// A decoded transaction whose signature slots can be filled in place.
#[derive(Debug, Clone)]
pub struct WireTransaction {
    bytes: Vec<u8>,
    version: MessageVersion,
    signers: Vec<SolanaAddress>,
    signatures_offset: usize,
    message_offset: usize,
}

impl WireTransaction {
    /// Decode a base64 transaction as returned by the aggregator.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(AppError::invalid_param("transaction cannot be empty"));
        }
        let bytes = BASE64_STANDARD.decode(encoded)?;
        Self::parse(bytes)
    }

    /// Parse raw transaction bytes.
    pub fn parse(bytes: Vec<u8>) -> Result<Self> {
        let mut reader = Reader::new(&bytes);

        let num_signatures = reader.compact_u16()?;
        let signatures_offset = reader.position();
        reader.take(num_signatures * SIGNATURE_BYTES)?;
        let message_offset = reader.position();

        let version = match reader.peek()? {
            b if b & VERSION_PREFIX_MASK != 0 => {
                let v = reader.u8()? & !VERSION_PREFIX_MASK;
                if v != 0 {
                    return Err(decode_err(format!("unsupported message version {v}")));
                }
                MessageVersion::V0
            }
            _ => MessageVersion::Legacy,
        };

        let num_required = reader.u8()? as usize;
        let num_readonly_signed = reader.u8()? as usize;
        let _num_readonly_unsigned = reader.u8()?;

        let num_keys = reader.compact_u16()?;
        let keys = reader.take(num_keys * PUBKEY_BYTES)?;
        reader.take(BLOCKHASH_BYTES)?;

        let num_instructions = reader.compact_u16()?;
        for _ in 0..num_instructions {
            let program_index = reader.u8()? as usize;
            if program_index >= num_keys {
                return Err(decode_err(format!(
                    "instruction program index {program_index} out of range"
                )));
            }
            let num_accounts = reader.compact_u16()?;
            reader.take(num_accounts)?;
            let data_len = reader.compact_u16()?;
            reader.take(data_len)?;
        }

        if version == MessageVersion::V0 {
            let num_lookups = reader.compact_u16()?;
            for _ in 0..num_lookups {
                reader.take(PUBKEY_BYTES)?;
                let writable = reader.compact_u16()?;
                reader.take(writable)?;
                let readonly = reader.compact_u16()?;
                reader.take(readonly)?;
            }
        }

        if !reader.is_empty() {
            return Err(decode_err(format!("{} trailing bytes", reader.remaining())));
        }

        if num_signatures != num_required {
            return Err(decode_err(format!(
                "{num_signatures} signature slots but header requires {num_required}"
            )));
        }
        if num_required > num_keys {
            return Err(decode_err(format!(
                "header requires {num_required} signers but only {num_keys} account keys present"
            )));
        }
        if num_readonly_signed > num_required {
            return Err(decode_err("more read-only signers than signers".to_string()));
        }

        let signers = keys
            .chunks_exact(PUBKEY_BYTES)
            .take(num_required)
            .map(|chunk| {
                let mut key = [0u8; PUBKEY_BYTES];
                key.copy_from_slice(chunk);
                SolanaAddress::new(key)
            })
            .collect();

        Ok(Self { bytes, version, signers, signatures_offset, message_offset })
    }

    /// Message format.
    pub fn version(&self) -> MessageVersion {
        self.version
    }

    /// Required signers, fee payer first.
    pub fn signers(&self) -> &[SolanaAddress] {
        &self.signers
    }

    /// The bytes covered by every signature.
    pub fn message(&self) -> &[u8] {
        &self.bytes[self.message_offset..]
    }

    /// Base58 signature in the given slot, if present.
    pub fn signature(&self, index: usize) -> Option<String> {
        if index >= self.signers.len() {
            return None;
        }
        let start = self.signatures_offset + index * SIGNATURE_BYTES;
        Some(bs58::encode(&self.bytes[start..start + SIGNATURE_BYTES]).into_string())
    }

    /// Sign the message with the wallet and place the signature in the wallet's slot.
    ///
    /// Returns the base58 signature, which is also the transaction id when the
    /// wallet is the fee payer.
    pub fn sign(&mut self, wallet: &WalletManager) -> Result<String> {
        let address = wallet.address();
        let index = self.signers.iter().position(|s| *s == address).ok_or_else(|| {
            let expected =
                self.signers.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            AppError::Signing(format!(
                "wallet {address} is not a required signer of this transaction (expected: {expected})"
            ))
        })?;

        let signature = wallet.sign(self.message());
        let start = self.signatures_offset + index * SIGNATURE_BYTES;
        self.bytes[start..start + SIGNATURE_BYTES].copy_from_slice(&signature);

        Ok(bs58::encode(signature).into_string())
    }

    /// Raw transaction bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Re-encode for submission.
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.bytes)
    }
}

fn decode_err(msg: impl Into<String>) -> AppError {
    AppError::Decode(format!("malformed transaction: {}", msg.into()))
}

/// Bounds-checked cursor over the transaction bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn peek(&self) -> Result<u8> {
        self.bytes.get(self.pos).copied().ok_or_else(|| decode_err("unexpected end of input"))
    }

    fn u8(&mut self) -> Result<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(decode_err(format!(
                "needed {len} bytes at offset {}, {} left",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Solana's compact-u16 ("short vec") length: 7 bits per byte, at most 3 bytes.
    fn compact_u16(&mut self) -> Result<usize> {
        let mut value: u32 = 0;
        for i in 0..3 {
            let byte = self.u8()?;
            value |= u32::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                if value > u32::from(u16::MAX) {
                    return Err(decode_err("compact-u16 overflow"));
                }
                return Ok(value as usize);
            }
        }
        Err(decode_err("compact-u16 longer than 3 bytes"))
    }
}
