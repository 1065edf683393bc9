//! Jupiter MCP Server Library
//!
//! A Model Context Protocol server for the Jupiter DEX aggregator on Solana.
//! Wraps the Ultra swap API and the Trigger limit order API, signing
//! transactions with a locally configured wallet.
//!
//! # Features
//!
//! - **Swaps**: Quote, sign and execute swaps through Jupiter Ultra
//! - **Limit Orders**: Create, list and cancel Trigger orders
//! - **Lookups**: Wallet balances, token search and security warnings
//!
//! # Example
//!
//! ```rust,ignore
//! use jupiter_mcp::{Config, JupiterServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = JupiterServer::new(config)?;
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod jupiter;
pub mod mcp;
pub mod services;
pub mod solana;
pub mod types;

pub use config::{Config, Network, SubmissionMode};
pub use error::{AppError, ErrorKind, Result};
pub use mcp::JupiterServer;
pub use solana::constants::*;
