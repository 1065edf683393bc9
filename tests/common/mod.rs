//! Common utilities for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use ed25519_dalek::SigningKey;
use jupiter_mcp::{
    solana::{SolanaAddress, WalletManager, WireTransaction},
    Config, JupiterServer, Network, SubmissionMode,
};
use serde_json::Value;

/// Secret half of the test keypair. Never funded.
pub const TEST_SECRET: [u8; 32] = [7u8; 32];

/// Base58 64-byte keypair for [`TEST_SECRET`].
pub fn test_private_key() -> String {
    keypair_b58(TEST_SECRET)
}

pub fn keypair_b58(secret: [u8; 32]) -> String {
    let signing_key = SigningKey::from_bytes(&secret);
    let mut keypair = [0u8; 64];
    keypair[..32].copy_from_slice(&secret);
    keypair[32..].copy_from_slice(signing_key.verifying_key().as_bytes());
    bs58::encode(keypair).into_string()
}

pub fn test_wallet() -> WalletManager {
    WalletManager::from_private_key(&test_private_key()).expect("test key is valid")
}

pub fn test_wallet_address() -> SolanaAddress {
    test_wallet().address()
}

fn push_compact(value: usize, out: &mut Vec<u8>) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if rem == 0 {
            break;
        }
    }
}

/// Unsigned legacy transfer-shaped transaction with `payer` as the only signer.
pub fn unsigned_transaction(payer: &SolanaAddress) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};

    let mut tx = Vec::new();
    push_compact(1, &mut tx);
    tx.extend_from_slice(&[0u8; 64]);

    tx.extend_from_slice(&[1, 0, 1]);
    push_compact(2, &mut tx);
    tx.extend_from_slice(payer.as_bytes());
    tx.extend_from_slice(&[0u8; 32]);
    tx.extend_from_slice(&[42u8; 32]);
    push_compact(1, &mut tx);
    tx.push(1);
    push_compact(1, &mut tx);
    tx.push(0);
    push_compact(12, &mut tx);
    tx.extend_from_slice(&[2, 0, 0, 0, 64, 66, 15, 0, 0, 0, 0, 0]);

    STANDARD.encode(tx)
}

/// Signature the test wallet produces for `transaction`.
pub fn expected_signature(transaction: &str) -> String {
    let mut tx = WireTransaction::from_base64(transaction).expect("valid transaction");
    tx.sign(&test_wallet()).expect("test wallet is a signer")
}

/// Config pointing every endpoint at a mock server.
pub fn mock_config(base_url: &str, submission_mode: SubmissionMode, timeout: Duration) -> Config {
    Config {
        rpc_url: format!("{base_url}/rpc"),
        private_key: test_private_key(),
        network: Network::Devnet,
        request_timeout: timeout,
        submission_mode,
        ultra_api_url: format!("{base_url}/ultra/v1"),
        trigger_api_url: format!("{base_url}/trigger/v1"),
        log_level: "warn".to_string(),
    }
}

pub fn mock_server(base_url: &str, submission_mode: SubmissionMode) -> JupiterServer {
    JupiterServer::new(mock_config(base_url, submission_mode, Duration::from_secs(5)))
        .expect("mock server config is valid")
}

/// Parse a tool response envelope.
pub fn envelope(response: Result<String, rmcp::ErrorData>) -> Value {
    let text = response.expect("tool responses are always envelopes");
    serde_json::from_str(&text).expect("envelope is JSON")
}

/// Helper to create a test server from environment variables.
pub fn create_test_server() -> Option<JupiterServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let rpc_url = std::env::var("SOLANA_RPC_URL").ok()?;
    let private_key = std::env::var("PRIVATE_KEY").ok()?;

    if rpc_url.is_empty() || private_key.is_empty() {
        return None;
    }

    let config = Config::from_lookup(|key| match key {
        "SOLANA_RPC_URL" => Some(rpc_url.clone()),
        "PRIVATE_KEY" => Some(private_key.clone()),
        "LOG_LEVEL" => Some("warn".to_string()),
        other => std::env::var(other).ok(),
    })
    .ok()?;

    JupiterServer::new(config).ok()
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!("Skipping test: SOLANA_RPC_URL or PRIVATE_KEY not set");
                return;
            }
        }
    };
}
