//! Solana network constants.
//!
//! Contains well-known mint and program addresses.

// ============================================================================
// Core Token Mints (Solana Mainnet)
// ============================================================================

/// Wrapped SOL mint.
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// USDC mint.
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// USDT mint.
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

/// Decimals shared by USDC and USDT.
pub const STABLECOIN_DECIMALS: u8 = 6;

// ============================================================================
// Programs
// ============================================================================

/// Jupiter referral program, owner of referral token accounts.
pub const JUPITER_REFERRAL_PROGRAM_ID: &str = "REFER4ZgmyYx9c6He5XfaTMiGfdLwRnkV4RPp9t9iF3";

// ============================================================================
// Wire format
// ============================================================================

/// Length of an ed25519 public key / Solana address.
pub const PUBKEY_BYTES: usize = 32;

/// Length of an ed25519 signature.
pub const SIGNATURE_BYTES: usize = 64;

/// Length of a Solana keypair (secret half followed by public half).
pub const KEYPAIR_BYTES: usize = 64;
