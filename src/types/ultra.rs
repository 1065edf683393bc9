//! Ultra swap API types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::amount::{opt_string_or_number, parse_base_units, string_or_number};
use crate::{
    error::{AppError, Result},
    solana::SolanaAddress,
};

/// Validated swap quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: SolanaAddress,
    pub output_mint: SolanaAddress,
    /// Input amount in base units.
    pub amount: u64,
}

impl QuoteRequest {
    pub fn parse(input_mint: &str, output_mint: &str, amount: &str) -> Result<Self> {
        let input_mint = SolanaAddress::parse_field("input_mint", input_mint)?;
        let output_mint = SolanaAddress::parse_field("output_mint", output_mint)?;
        if input_mint == output_mint {
            return Err(AppError::invalid_param("input_mint and output_mint cannot be the same"));
        }
        let amount = parse_base_units("amount", amount)?;

        Ok(Self { input_mint, output_mint, amount })
    }
}

/// Raw `/order` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub transaction: Option<String>,
    pub request_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub in_amount: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub out_amount: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub other_amount_threshold: Option<String>,
    pub slippage_bps: Option<u32>,
    pub price_impact_pct: Option<Value>,
    pub fee_bps: Option<u32>,
    pub swap_type: Option<String>,
    pub route_plan: Option<Value>,
    pub error_message: Option<String>,
    pub error: Option<String>,
}

/// A swap quote with its unsigned transaction.
///
/// `transaction` and `request_id` are always both present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Base64 unsigned transaction.
    pub transaction: String,
    /// Correlation id for `execute_swap_transaction`.
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_amount_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_impact_pct: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_bps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_plan: Option<Value>,
}

impl TryFrom<OrderResponse> for SwapQuote {
    type Error = AppError;

    fn try_from(raw: OrderResponse) -> Result<Self> {
        let reason = || {
            raw.error_message
                .clone()
                .or_else(|| raw.error.clone())
                .unwrap_or_else(|| "quote returned no transaction".to_string())
        };

        let transaction = match raw.transaction.as_deref().map(str::trim) {
            Some(tx) if !tx.is_empty() => tx.to_string(),
            _ => return Err(AppError::Upstream { status: 200, body: reason() }),
        };
        let request_id = match raw.request_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(AppError::Upstream {
                    status: 200,
                    body: "quote returned no requestId".to_string(),
                })
            }
        };

        Ok(Self {
            transaction,
            request_id,
            in_amount: raw.in_amount,
            out_amount: raw.out_amount,
            other_amount_threshold: raw.other_amount_threshold,
            slippage_bps: raw.slippage_bps,
            price_impact_pct: raw.price_impact_pct,
            fee_bps: raw.fee_bps,
            swap_type: raw.swap_type,
            route_plan: raw.route_plan,
        })
    }
}

/// Balance entry as returned by `/balances`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBalance {
    pub mint: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub ui_amount: Option<f64>,
    pub decimals: Option<u8>,
    #[serde(default)]
    pub is_frozen: bool,
}

/// `/balances` payload: keyed by mint (`"SOL"` for native SOL), or a plain list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BalancesPayload {
    List(Vec<RawBalance>),
    Map(BTreeMap<String, RawBalance>),
}

/// Token balance of a wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    /// Token mint, or `"SOL"` for native SOL.
    pub mint: String,
    /// Raw amount in base units.
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    pub is_frozen: bool,
}

impl BalancesPayload {
    pub(crate) fn into_balances(self) -> Vec<TokenBalance> {
        let entries: Vec<(String, RawBalance)> = match self {
            BalancesPayload::List(list) => list
                .into_iter()
                .map(|b| (b.mint.clone().unwrap_or_default(), b))
                .collect(),
            BalancesPayload::Map(map) => map.into_iter().collect(),
        };

        entries
            .into_iter()
            .map(|(mint, b)| TokenBalance {
                mint,
                amount: b.amount,
                ui_amount: b.ui_amount,
                decimals: b.decimals,
                is_frozen: b.is_frozen,
            })
            .collect()
    }
}

/// A single security warning from `/shield`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldWarning {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

/// Security warnings keyed by mint. Mints without warnings may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShieldReport {
    #[serde(default)]
    pub warnings: BTreeMap<String, Vec<ShieldWarning>>,
}

/// Token metadata from `/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct TokenInfo {
    /// Mint address.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
