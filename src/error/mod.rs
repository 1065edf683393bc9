//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument failed local validation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Private key material could not be turned into a keypair.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Non-success HTTP status from the aggregator.
    #[error("Upstream error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    /// Outbound call exceeded the configured timeout.
    ///
    /// `signature` is set when the call was delivering an already signed transaction.
    #[error("Request timed out after {} seconds", .after.as_secs())]
    Timeout { after: Duration, signature: Option<String> },

    /// Network-level failure before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transaction payload is not valid base64 or not a Solana transaction.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The configured wallet cannot sign the transaction.
    #[error("Signing error: {0}")]
    Signing(String),

    /// A signed transaction was rejected or could not be delivered.
    #[error("Submission error: {message}")]
    Submission { message: String, signature: Option<String> },
}

/// Stable, machine-readable error code carried in failed tool responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    InvalidParameter,
    InvalidKey,
    Upstream,
    Timeout,
    Transport,
    Parse,
    Decode,
    Signing,
    Submission,
}

impl AppError {
    /// Error code for the tool response envelope.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Configuration,
            AppError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            AppError::InvalidKey(_) => ErrorKind::InvalidKey,
            AppError::Upstream { .. } => ErrorKind::Upstream,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Transport(_) => ErrorKind::Transport,
            AppError::Parse(_) => ErrorKind::Parse,
            AppError::Decode(_) => ErrorKind::Decode,
            AppError::Signing(_) => ErrorKind::Signing,
            AppError::Submission { .. } => ErrorKind::Submission,
        }
    }

    /// Transaction signature attached to a submission failure, if any.
    pub fn signature(&self) -> Option<&str> {
        match self {
            AppError::Submission { signature, .. } | AppError::Timeout { signature, .. } => {
                signature.as_deref()
            }
            _ => None,
        }
    }

    /// Re-wrap a failure that happened while delivering a signed transaction.
    ///
    /// The signature is kept so the caller can look the transaction up on-chain
    /// before deciding whether to re-quote. Timeouts stay timeouts.
    pub fn into_submission(self, signature: Option<String>) -> AppError {
        match self {
            AppError::Submission { message, signature: upstream } => {
                AppError::Submission { message, signature: upstream.or(signature) }
            }
            AppError::Timeout { after, signature: upstream } => {
                AppError::Timeout { after, signature: upstream.or(signature) }
            }
            other => AppError::Submission { message: other.to_string(), signature },
        }
    }

    pub(crate) fn invalid_param(msg: impl Into<String>) -> Self {
        AppError::InvalidParameter(msg.into())
    }

    /// Map a reqwest failure, given the timeout the client was built with.
    pub(crate) fn from_http(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AppError::Timeout { after: timeout, signature: None }
        } else if err.is_decode() {
            AppError::Parse(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::Decode(format!("invalid base64: {err}"))
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_config_display() {
        let err = AppError::Config("PRIVATE_KEY environment variable not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: PRIVATE_KEY environment variable not set");
    }

    #[test]
    fn test_app_error_upstream_display_carries_status_and_body() {
        let err = AppError::Upstream { status: 400, body: "{\"error\":\"bad mint\"}".to_string() };
        assert_eq!(err.to_string(), "Upstream error (HTTP 400): {\"error\":\"bad mint\"}");
    }

    #[test]
    fn test_app_error_timeout_display() {
        let err = AppError::Timeout { after: Duration::from_secs(30), signature: None };
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
    }

    #[test]
    fn test_app_error_kinds() {
        assert_eq!(AppError::Config(String::new()).kind(), ErrorKind::Configuration);
        assert_eq!(AppError::invalid_param("x").kind(), ErrorKind::InvalidParameter);
        assert_eq!(AppError::Decode(String::new()).kind(), ErrorKind::Decode);
        assert_eq!(AppError::Signing(String::new()).kind(), ErrorKind::Signing);
        assert_eq!(
            AppError::Submission { message: String::new(), signature: None }.kind(),
            ErrorKind::Submission
        );
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InvalidParameter).unwrap();
        assert_eq!(json, "\"invalid_parameter\"");
    }

    #[test]
    fn test_into_submission_keeps_local_signature() {
        let err = AppError::Upstream { status: 502, body: "bad gateway".to_string() };
        let wrapped = err.into_submission(Some("5sig".to_string()));

        assert_eq!(wrapped.kind(), ErrorKind::Submission);
        assert_eq!(wrapped.signature(), Some("5sig"));
        assert!(wrapped.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_into_submission_prefers_upstream_signature() {
        let err = AppError::Submission {
            message: "Failed".to_string(),
            signature: Some("upstream".to_string()),
        };
        let wrapped = err.into_submission(Some("local".to_string()));
        assert_eq!(wrapped.signature(), Some("upstream"));
    }

    #[test]
    fn test_signature_absent_for_other_errors() {
        assert!(AppError::Transport("connection reset".to_string()).signature().is_none());
        let timeout = AppError::Timeout { after: Duration::from_secs(1), signature: None };
        assert!(timeout.signature().is_none());
    }

    #[test]
    fn test_into_submission_keeps_timeout_kind() {
        let err = AppError::Timeout { after: Duration::from_secs(30), signature: None };
        let wrapped = err.into_submission(Some("5sig".to_string()));

        assert_eq!(wrapped.kind(), ErrorKind::Timeout);
        assert_eq!(wrapped.signature(), Some("5sig"));
        assert_eq!(wrapped.to_string(), "Request timed out after 30 seconds");
    }

    #[test]
    fn test_from_base64_error() {
        use base64::Engine;
        let err = base64::engine::general_purpose::STANDARD.decode("@@@").unwrap_err();
        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app_err: AppError = err.into();
        match app_err {
            AppError::Parse(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Parse error"),
        }
    }
}
