//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::{JupiterServer, WALLET_INFO_URI};
pub use server::{
    CancelLimitOrderInput, CancelLimitOrdersInput, CreateLimitOrderInput, ExecuteTransactionInput,
    GetBalancesInput, GetLimitOrdersInput, GetShieldInput, GetSwapQuoteInput, SearchTokenInput,
};
