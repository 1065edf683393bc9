//! Program-derived addresses.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};

use super::{address::SolanaAddress, constants::JUPITER_REFERRAL_PROGRAM_ID};
use crate::error::{AppError, Result};

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";
const MAX_SEED_LEN: usize = 32;

/// Find the canonical program address for `seeds`, searching bumps from 255 down.
///
/// A valid address is one that is not a point on the ed25519 curve, so no
/// private key can exist for it.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &SolanaAddress,
) -> Result<(SolanaAddress, u8)> {
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(AppError::invalid_param(format!(
            "seed of {} bytes exceeds the {MAX_SEED_LEN}-byte limit",
            seed.len()
        )));
    }

    for bump in (0..=u8::MAX).rev() {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update([bump]);
        hasher.update(program_id.as_bytes());
        hasher.update(PDA_MARKER);
        let hash: [u8; 32] = hasher.finalize().into();

        if VerifyingKey::from_bytes(&hash).is_err() {
            return Ok((SolanaAddress::new(hash), bump));
        }
    }

    Err(AppError::invalid_param("no off-curve program address found for seeds"))
}

/// Referral token account that collects fees in `mint` for `referral_account`.
pub fn referral_token_account(
    referral_account: &SolanaAddress,
    mint: &SolanaAddress,
) -> Result<SolanaAddress> {
    let program_id: SolanaAddress = JUPITER_REFERRAL_PROGRAM_ID.parse()?;
    let (address, _bump) = find_program_address(
        &[b"referral_ata", referral_account.as_bytes(), mint.as_bytes()],
        &program_id,
    )?;
    Ok(address)
}
