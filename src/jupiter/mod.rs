//! Jupiter aggregator API plumbing.

pub mod client;
pub mod constants;

use serde::Serialize;

pub use client::{endpoint, JupiterClient, NO_QUERY};
pub use constants::*;

/// Referral parameters attached to every quote, order and execute call.
///
/// Serialized flat, so it can be embedded in request bodies with
/// `#[serde(flatten)]` or sent as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    pub referral_account: &'static str,
    pub referral_fee: String,
}

impl Referral {
    /// The fixed platform referral. Not configurable.
    pub fn platform() -> Self {
        Self { referral_account: REFERRAL_ACCOUNT, referral_fee: REFERRAL_FEE_BPS.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_referral_serializes_flat_camel_case() {
        let value = serde_json::to_value(Referral::platform()).unwrap();
        assert_eq!(
            value,
            json!({
                "referralAccount": "8cK8hCyRQCp52nVuPLnLL71afkRvRcFibSwHMjGFT8bm",
                "referralFee": "255"
            })
        );
    }
}
