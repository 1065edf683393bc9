//! Uniform tool response envelope.

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::error::{AppError, ErrorKind};

/// Result of a tool call, as seen by the MCP client.
///
/// Serializes to `{"success": true, "data": ...}` or
/// `{"success": false, "code": ..., "error": ..., "signature"?: ...}`.
#[derive(Debug)]
pub enum ToolResponse<T> {
    Success(T),
    Failure { kind: ErrorKind, error: String, signature: Option<String> },
}

impl<T> From<Result<T, AppError>> for ToolResponse<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => ToolResponse::Success(data),
            Err(err) => ToolResponse::Failure {
                kind: err.kind(),
                signature: err.signature().map(str::to_string),
                error: err.to_string(),
            },
        }
    }
}

impl<T: Serialize> Serialize for ToolResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ToolResponse::Success(data) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            ToolResponse::Failure { kind, error, signature } => {
                let len = if signature.is_some() { 4 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("code", kind)?;
                map.serialize_entry("error", error)?;
                if let Some(signature) = signature {
                    map.serialize_entry("signature", signature)?;
                }
                map.end()
            }
        }
    }
}
