//! Type definitions module.
//!
//! Contains request, response and wire types shared across the application.

pub mod amount;
pub mod execution;
pub mod response;
pub mod trigger;
pub mod ultra;

pub use amount::{parse_base_units, to_decimal};
pub use execution::*;
pub use response::ToolResponse;
pub use trigger::*;
pub use ultra::*;
