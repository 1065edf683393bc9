//! Trigger (limit order) API types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::amount::{opt_string_or_number, parse_base_units, string_or_number};
use crate::{
    error::{AppError, Result},
    solana::SolanaAddress,
};

/// Upper bound for slippage, in basis points (100%).
pub const MAX_SLIPPAGE_BPS: u32 = 10_000;

/// Validated limit order request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLimitOrderRequest {
    pub input_mint: SolanaAddress,
    pub output_mint: SolanaAddress,
    /// Input amount the maker sells, in base units.
    pub making_amount: u64,
    /// Output amount the maker wants, in base units.
    pub taking_amount: u64,
    /// Only set when greater than zero.
    pub slippage_bps: Option<u32>,
    /// Unix timestamp (seconds).
    pub expired_at: Option<i64>,
}

impl CreateLimitOrderRequest {
    /// Validate caller input. `now` is the current unix time, used to reject past expiries.
    pub fn parse(
        input_mint: &str,
        output_mint: &str,
        making_amount: &str,
        taking_amount: &str,
        slippage_bps: Option<u32>,
        expired_at: Option<i64>,
        now: i64,
    ) -> Result<Self> {
        let input_mint = SolanaAddress::parse_field("input_mint", input_mint)?;
        let output_mint = SolanaAddress::parse_field("output_mint", output_mint)?;
        if input_mint == output_mint {
            return Err(AppError::invalid_param("input_mint and output_mint cannot be the same"));
        }

        let making_amount = parse_base_units("making_amount", making_amount)?;
        let taking_amount = parse_base_units("taking_amount", taking_amount)?;

        if let Some(bps) = slippage_bps {
            if bps > MAX_SLIPPAGE_BPS {
                return Err(AppError::invalid_param(format!(
                    "slippage_bps must be between 0 and {MAX_SLIPPAGE_BPS}, got {bps}"
                )));
            }
        }

        if let Some(ts) = expired_at {
            if ts <= now {
                return Err(AppError::invalid_param(format!(
                    "expired_at must be in the future (got {ts}, now {now})"
                )));
            }
        }

        Ok(Self {
            input_mint,
            output_mint,
            making_amount,
            taking_amount,
            slippage_bps: slippage_bps.filter(|bps| *bps > 0),
            expired_at,
        })
    }
}

/// Which orders to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Open orders.
    #[default]
    Active,
    /// Filled, cancelled and expired orders.
    History,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::History => "history",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(OrderStatus::Active),
            "history" => Ok(OrderStatus::History),
            _ => Err(AppError::invalid_param(format!(
                "Invalid order status: '{s}' (expected 'active' or 'history')"
            ))),
        }
    }
}

/// Response of `createOrder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CreatedLimitOrder {
    /// Order account the transaction will create.
    pub order: String,
    /// Base64 unsigned transaction.
    pub transaction: String,
    pub request_id: String,
}

/// Response of `cancelOrder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CancelOrderTx {
    pub transaction: String,
    pub request_id: String,
}

/// Response of `cancelOrders`: one transaction per batch of orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct CancelOrdersBatch {
    pub transactions: Vec<String>,
    pub request_id: String,
}

/// A limit order as reported by `getTriggerOrders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct LimitOrder {
    #[serde(rename(deserialize = "orderKey"), alias = "orderAccount")]
    pub order_account: String,
    #[serde(default)]
    pub input_mint: String,
    #[serde(default)]
    pub output_mint: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub making_amount: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub taking_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub expired_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

/// Raw `getTriggerOrders` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TriggerOrdersResponse {
    #[serde(default)]
    pub orders: Vec<LimitOrder>,
    pub has_more_data: Option<bool>,
    pub total_pages: Option<u32>,
}

impl TriggerOrdersResponse {
    /// `hasMoreData` when reported, otherwise derived from `totalPages`.
    pub(crate) fn has_more_data(&self, page: u32) -> bool {
        self.has_more_data.unwrap_or_else(|| self.total_pages.is_some_and(|total| total > page))
    }
}

/// One page of limit orders.
#[derive(Debug, Clone, Serialize)]
pub struct LimitOrdersPage {
    pub wallet_address: String,
    pub status: OrderStatus,
    pub page: u32,
    pub orders: Vec<LimitOrder>,
    pub has_more_data: bool,
}
