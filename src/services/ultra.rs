//! Ultra swap API service: quotes, balances, token search and shield.

use crate::{
    error::{AppError, Result},
    jupiter::{endpoint, JupiterClient, Referral, NO_QUERY},
    solana::SolanaAddress,
    types::{
        BalancesPayload, OrderResponse, QuoteRequest, ShieldReport, SwapQuote, TokenBalance,
        TokenInfo,
    },
};

/// Service for the read-only Ultra endpoints.
#[derive(Debug, Clone)]
pub struct UltraService {
    client: JupiterClient,
    base_url: String,
    wallet_address: SolanaAddress,
}

impl UltraService {
    /// Create a new Ultra service. Quotes are built for `wallet_address` as taker.
    pub fn new(client: JupiterClient, base_url: String, wallet_address: SolanaAddress) -> Self {
        Self { client, base_url, wallet_address }
    }

    /// Ultra API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a quote and unsigned swap transaction.
    pub async fn get_swap_quote(&self, request: &QuoteRequest) -> Result<SwapQuote> {
        tracing::debug!(
            input_mint = %request.input_mint,
            output_mint = %request.output_mint,
            amount = request.amount,
            "Requesting swap quote"
        );

        let referral = Referral::platform();
        let query = [
            ("inputMint", request.input_mint.to_string()),
            ("outputMint", request.output_mint.to_string()),
            ("amount", request.amount.to_string()),
            ("taker", self.wallet_address.to_string()),
            ("referralAccount", referral.referral_account.to_string()),
            ("referralFee", referral.referral_fee),
        ];

        let raw: OrderResponse =
            self.client.get_json(&endpoint(&self.base_url, "order"), &query).await?;

        SwapQuote::try_from(raw)
    }

    /// Get token balances. Defaults to the configured wallet.
    pub async fn get_balances(&self, wallet: Option<SolanaAddress>) -> Result<Vec<TokenBalance>> {
        let wallet = wallet.unwrap_or(self.wallet_address);
        tracing::debug!(wallet = %wallet, "Fetching balances");

        let payload: BalancesPayload = self
            .client
            .get_json(&endpoint(&self.base_url, &format!("balances/{wallet}")), NO_QUERY)
            .await?;

        Ok(payload.into_balances())
    }

    /// Get security warnings for a comma-separated list of mints.
    pub async fn get_shield(&self, mints: &str) -> Result<ShieldReport> {
        let parsed = parse_mint_list(mints)?;
        let joined = parsed.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");

        tracing::debug!(mints = %joined, "Fetching shield warnings");

        self.client.get_json(&endpoint(&self.base_url, "shield"), &[("mints", joined)]).await
    }

    /// Search tokens by symbol, name or mint.
    pub async fn search_token(&self, query: &str) -> Result<Vec<TokenInfo>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_param("query cannot be empty"));
        }

        tracing::debug!(query, "Searching tokens");

        self.client.get_json(&endpoint(&self.base_url, "search"), &[("query", query)]).await
    }
}

/// Split and validate a comma-separated list of mint addresses.
fn parse_mint_list(mints: &str) -> Result<Vec<SolanaAddress>> {
    let parsed = mints
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| SolanaAddress::parse_field("mints", m))
        .collect::<Result<Vec<_>>>()?;

    if parsed.is_empty() {
        return Err(AppError::invalid_param("mints cannot be empty"));
    }
    Ok(parsed)
}
