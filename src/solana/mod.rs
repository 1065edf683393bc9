//! Solana primitives: addresses, wallet, wire transactions, RPC.

pub mod address;
pub mod constants;
pub mod pda;
pub mod rpc;
pub mod transaction;
pub mod wallet;

pub use address::SolanaAddress;
pub use rpc::SolanaRpcClient;
pub use transaction::{MessageVersion, WireTransaction};
pub use wallet::WalletManager;
