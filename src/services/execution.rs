//! Sign-and-submit for aggregator-built transactions.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    config::SubmissionMode,
    error::{AppError, Result},
    jupiter::{endpoint, JupiterClient, Referral},
    solana::{SolanaRpcClient, WalletManager, WireTransaction},
    types::{
        ExecuteResponse, SignedSubmissionResult, SubmissionStatus, SubmitRoute,
        UnsignedTransactionEnvelope, Venue,
    },
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteBody<'a> {
    signed_transaction: &'a str,
    request_id: &'a str,
    #[serde(flatten)]
    referral: Referral,
}

/// Signs unsigned transactions with the wallet and delivers them.
///
/// Nothing here retries: a failed submission is returned as-is, carrying the
/// signature so the caller can check the chain before re-quoting.
#[derive(Debug, Clone)]
pub struct ExecutionService {
    client: JupiterClient,
    rpc: SolanaRpcClient,
    wallet: Arc<WalletManager>,
    ultra_url: String,
    trigger_url: String,
    mode: SubmissionMode,
}

impl ExecutionService {
    /// Create a new execution service.
    pub fn new(
        client: JupiterClient,
        rpc: SolanaRpcClient,
        wallet: Arc<WalletManager>,
        ultra_url: String,
        trigger_url: String,
        mode: SubmissionMode,
    ) -> Self {
        Self { client, rpc, wallet, ultra_url, trigger_url, mode }
    }

    /// Route a transaction from `venue` takes under the configured mode.
    pub fn route_for(&self, venue: Venue) -> SubmitRoute {
        match (self.mode, venue) {
            (SubmissionMode::Rpc, _) => SubmitRoute::Rpc,
            (SubmissionMode::Aggregator, Venue::Ultra) => SubmitRoute::UltraExecute,
            (SubmissionMode::Aggregator, Venue::Trigger) => SubmitRoute::TriggerExecute,
        }
    }

    /// Decode, sign, re-encode and submit.
    pub async fn sign_and_submit(
        &self,
        envelope: &UnsignedTransactionEnvelope,
        venue: Venue,
    ) -> Result<SignedSubmissionResult> {
        let request_id = envelope.request_id.trim();
        if request_id.is_empty() {
            return Err(AppError::invalid_param("request_id cannot be empty"));
        }

        let mut tx = WireTransaction::from_base64(&envelope.transaction)?;
        let signature = tx.sign(&self.wallet)?;
        let signed = tx.to_base64();

        let route = self.route_for(venue);
        tracing::warn!(
            signature = %signature,
            request_id,
            route = ?route,
            "Submitting signed transaction"
        );

        match route {
            SubmitRoute::UltraExecute => {
                self.execute(&self.ultra_url, &signed, request_id, signature, route).await
            }
            SubmitRoute::TriggerExecute => {
                self.execute(&self.trigger_url, &signed, request_id, signature, route).await
            }
            SubmitRoute::Rpc => {
                let rpc_signature = self
                    .rpc
                    .send_transaction(&signed)
                    .await
                    .map_err(|e| e.into_submission(Some(signature.clone())))?;

                if rpc_signature != signature {
                    tracing::warn!(
                        local = %signature,
                        rpc = %rpc_signature,
                        "RPC reported a different signature"
                    );
                }

                Ok(SignedSubmissionResult {
                    signature: rpc_signature,
                    status: SubmissionStatus::Success,
                    route,
                    request_id: Some(request_id.to_string()),
                    slot: None,
                })
            }
        }
    }

    async fn execute(
        &self,
        base_url: &str,
        signed: &str,
        request_id: &str,
        signature: String,
        route: SubmitRoute,
    ) -> Result<SignedSubmissionResult> {
        let body =
            ExecuteBody { signed_transaction: signed, request_id, referral: Referral::platform() };

        let response: ExecuteResponse = self
            .client
            .post_json(&endpoint(base_url, "execute"), &body)
            .await
            .map_err(|e| e.into_submission(Some(signature.clone())))?;

        let signature = response.signature.clone().filter(|s| !s.is_empty()).unwrap_or(signature);

        if response.status() == SubmissionStatus::Failed {
            return Err(AppError::Submission {
                message: response.failure_message(),
                signature: Some(signature),
            });
        }

        Ok(SignedSubmissionResult {
            signature,
            status: SubmissionStatus::Success,
            route,
            request_id: Some(request_id.to_string()),
            slot: response.slot,
        })
    }
}
