//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    error::AppError,
    jupiter::{DEFAULT_TRIGGER_API_URL, DEFAULT_ULTRA_API_URL},
    solana::WalletManager,
};

/// Default timeout for outbound HTTP calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Solana cluster the wallet operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    MainnetBeta,
    #[default]
    Devnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::MainnetBeta => "mainnet-beta",
            Network::Devnet => "devnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Ok(Network::MainnetBeta),
            "devnet" => Ok(Network::Devnet),
            other => Err(AppError::Config(format!(
                "SOLANA_NETWORK must be 'mainnet-beta' or 'devnet', got '{other}'"
            ))),
        }
    }
}

/// Where signed transactions are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionMode {
    /// The aggregator's `/execute` endpoint for the originating API.
    #[default]
    Aggregator,
    /// `sendTransaction` on `SOLANA_RPC_URL`.
    Rpc,
}

impl SubmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionMode::Aggregator => "aggregator",
            SubmissionMode::Rpc => "rpc",
        }
    }
}

impl FromStr for SubmissionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aggregator" => Ok(SubmissionMode::Aggregator),
            "rpc" => Ok(SubmissionMode::Rpc),
            other => Err(AppError::Config(format!(
                "SUBMISSION_MODE must be 'aggregator' or 'rpc', got '{other}'"
            ))),
        }
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Solana JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Wallet keypair (base58, 64 bytes).
    pub private_key: String,
    /// Cluster name.
    pub network: Network,
    /// Timeout applied to every outbound HTTP call.
    pub request_timeout: Duration,
    /// Delivery route for signed transactions.
    pub submission_mode: SubmissionMode,
    /// Ultra swap API base URL.
    pub ultra_api_url: String,
    /// Trigger API base URL.
    pub trigger_api_url: String,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `SOLANA_RPC_URL`: Solana JSON-RPC endpoint
    /// - `PRIVATE_KEY`: Wallet keypair (base58)
    ///
    /// Optional environment variables:
    /// - `SOLANA_NETWORK`: `mainnet-beta` or `devnet` (default: devnet)
    /// - `REQUEST_TIMEOUT`: seconds (default: 30)
    /// - `SUBMISSION_MODE`: `aggregator` or `rpc` (default: aggregator)
    /// - `JUPITER_ULTRA_API_URL`, `JUPITER_TRIGGER_API_URL`: API base URLs
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let rpc_url = get("SOLANA_RPC_URL")
            .ok_or_else(|| AppError::Config("SOLANA_RPC_URL environment variable not set".into()))?;
        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "SOLANA_RPC_URL must be an http(s) URL, got '{rpc_url}'"
            )));
        }

        let private_key = get("PRIVATE_KEY")
            .ok_or_else(|| AppError::Config("PRIVATE_KEY environment variable not set".into()))?;
        WalletManager::from_private_key(&private_key)
            .map_err(|e| AppError::Config(format!("PRIVATE_KEY is invalid: {e}")))?;

        let network =
            get("SOLANA_NETWORK").map(|v| v.parse::<Network>()).transpose()?.unwrap_or_default();

        let request_timeout = match get("REQUEST_TIMEOUT") {
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(AppError::Config(format!(
                        "REQUEST_TIMEOUT must be a positive number of seconds, got '{raw}'"
                    )))
                }
            },
        };

        let submission_mode = get("SUBMISSION_MODE")
            .map(|v| v.parse::<SubmissionMode>())
            .transpose()?
            .unwrap_or_default();

        let ultra_api_url =
            get("JUPITER_ULTRA_API_URL").unwrap_or_else(|| DEFAULT_ULTRA_API_URL.to_string());
        let trigger_api_url =
            get("JUPITER_TRIGGER_API_URL").unwrap_or_else(|| DEFAULT_TRIGGER_API_URL.to_string());

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            rpc_url,
            private_key,
            network,
            request_timeout,
            submission_mode,
            ultra_api_url,
            trigger_api_url,
            log_level,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("network", &self.network)
            .field("request_timeout", &self.request_timeout)
            .field("submission_mode", &self.submission_mode)
            .field("ultra_api_url", &self.ultra_api_url)
            .field("trigger_api_url", &self.trigger_api_url)
            .field("log_level", &self.log_level)
            .finish()
    }
}
