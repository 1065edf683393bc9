//! Business logic services module.

pub mod execution;
pub mod price;
pub mod trigger;
pub mod ultra;

pub use execution::ExecutionService;
pub use price::{JupiterPriceOracle, TokenPriceOracle, TokenQuote};
pub use trigger::{CancelScope, TriggerService};
pub use ultra::UltraService;
