//! Signing and submission types.

use serde::{Deserialize, Serialize};

use super::amount::opt_string_or_number;

/// Where an unsigned transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    /// Ultra swap API.
    Ultra,
    /// Trigger limit-order API.
    Trigger,
}

/// Endpoint a signed transaction is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitRoute {
    /// `POST {ultra}/execute`.
    UltraExecute,
    /// `POST {trigger}/execute`.
    TriggerExecute,
    /// JSON-RPC `sendTransaction`.
    Rpc,
}

/// An unsigned transaction and its correlation id, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransactionEnvelope {
    /// Base64 transaction as received from the aggregator.
    pub transaction: String,
    pub request_id: String,
}

impl UnsignedTransactionEnvelope {
    pub fn new(transaction: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self { transaction: transaction.into(), request_id: request_id.into() }
    }
}

/// Terminal outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Success,
    Failed,
}

/// Result of signing and submitting a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct SignedSubmissionResult {
    /// Base58 transaction signature.
    pub signature: String,
    pub status: SubmissionStatus,
    pub route: SubmitRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// Raw `/execute` response, shared by Ultra and Trigger.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteResponse {
    pub status: Option<String>,
    pub signature: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub slot: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub code: Option<String>,
    pub error: Option<String>,
}

impl ExecuteResponse {
    pub(crate) fn status(&self) -> SubmissionStatus {
        match self.status.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("success") => SubmissionStatus::Success,
            _ => SubmissionStatus::Failed,
        }
    }

    /// Human-readable failure reason.
    pub(crate) fn failure_message(&self) -> String {
        let reason = self.error.as_deref().unwrap_or("transaction failed");
        match &self.code {
            Some(code) => format!("{reason} (code {code})"),
            None => reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_response_status() {
        let ok: ExecuteResponse =
            serde_json::from_value(json!({"status": "Success", "signature": "5x", "slot": "42"}))
                .unwrap();
        assert_eq!(ok.status(), SubmissionStatus::Success);
        assert_eq!(ok.slot.as_deref(), Some("42"));

        let failed: ExecuteResponse = serde_json::from_value(json!({
            "status": "Failed",
            "signature": "5x",
            "code": -1005,
            "error": "Transaction expired"
        }))
        .unwrap();
        assert_eq!(failed.status(), SubmissionStatus::Failed);
        assert_eq!(failed.failure_message(), "Transaction expired (code -1005)");
    }

    #[test]
    fn test_missing_status_is_failure() {
        let resp: ExecuteResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.status(), SubmissionStatus::Failed);
        assert_eq!(resp.failure_message(), "transaction failed");
    }

    #[test]
    fn test_signed_result_serialization() {
        let result = SignedSubmissionResult {
            signature: "5sig".to_string(),
            status: SubmissionStatus::Success,
            route: SubmitRoute::Rpc,
            request_id: None,
            slot: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"signature": "5sig", "status": "Success", "route": "rpc"}));
    }
}
