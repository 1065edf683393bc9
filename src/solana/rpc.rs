//! Solana JSON-RPC client.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::{AppError, Result};

/// Minimal JSON-RPC client for direct transaction submission.
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    http: reqwest::Client,
    rpc_url: String,
    timeout: Duration,
}

impl SolanaRpcClient {
    /// Create a client over a shared HTTP connection pool.
    pub fn new(http: reqwest::Client, rpc_url: impl Into<String>, timeout: Duration) -> Self {
        Self { http, rpc_url: rpc_url.into(), timeout }
    }

    /// RPC endpoint URL.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Make a Solana JSON-RPC call and return its `result`.
    pub async fn rpc_call(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        tracing::debug!(method, url = %self.rpc_url, "Solana RPC call");

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::from_http(e, self.timeout))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| AppError::from_http(e, self.timeout))?;
        if !status.is_success() {
            return Err(AppError::Upstream { status: status.as_u16(), body: text });
        }

        let mut json: Value = serde_json::from_str(&text)?;

        if let Some(error) = json.get("error") {
            return Err(AppError::Submission {
                message: format!("Solana RPC error: {error}"),
                signature: None,
            });
        }

        json.get_mut("result")
            .map(Value::take)
            .ok_or_else(|| AppError::Parse("Solana RPC: missing 'result' field".into()))
    }

    /// Broadcast a signed, base64-encoded transaction. Returns the signature the node reports.
    pub async fn send_transaction(&self, signed_transaction: &str) -> Result<String> {
        let result = self
            .rpc_call(
                "sendTransaction",
                json!([signed_transaction, { "encoding": "base64", "skipPreflight": false }]),
            )
            .await?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::Parse(format!("sendTransaction returned {result}")))
    }
}
