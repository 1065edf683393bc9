//! Trigger API service: limit order lifecycle.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    jupiter::{
        endpoint, JupiterClient, Referral, COMPUTE_UNIT_PRICE, MIN_ORDER_USD, REFERRAL_ACCOUNT,
        REFERRAL_FEE_BPS,
    },
    services::price::TokenPriceOracle,
    solana::{pda::referral_token_account, SolanaAddress},
    types::{
        CancelOrderTx, CancelOrdersBatch, CreateLimitOrderRequest, CreatedLimitOrder,
        LimitOrdersPage, OrderStatus, TriggerOrdersResponse,
    },
};

/// Which orders `cancel_limit_orders` targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelScope {
    /// Every active order of the configured wallet.
    All,
    /// Only the listed order accounts.
    Orders(Vec<SolanaAddress>),
}

impl CancelScope {
    /// Interpret a caller-supplied order list.
    ///
    /// An absent or empty list means every active order.
    pub fn from_requested(orders: Option<Vec<String>>) -> Result<Self> {
        let orders = orders.unwrap_or_default();
        if orders.is_empty() {
            return Ok(CancelScope::All);
        }

        orders
            .iter()
            .map(|o| SolanaAddress::parse_field("orders", o))
            .collect::<Result<Vec<_>>>()
            .map(CancelScope::Orders)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody {
    input_mint: String,
    output_mint: String,
    maker: String,
    payer: String,
    params: CreateOrderParams,
    compute_unit_price: &'static str,
    fee_account: String,
    #[serde(flatten)]
    referral: Referral,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderParams {
    making_amount: String,
    taking_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slippage_bps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expired_at: Option<String>,
    fee_bps: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelOrderBody {
    maker: String,
    order: String,
    compute_unit_price: &'static str,
    #[serde(flatten)]
    referral: Referral,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelOrdersBody {
    maker: String,
    compute_unit_price: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    orders: Option<Vec<String>>,
    #[serde(flatten)]
    referral: Referral,
}

/// Service for the Trigger limit order endpoints.
#[derive(Clone)]
pub struct TriggerService {
    client: JupiterClient,
    base_url: String,
    wallet_address: SolanaAddress,
    price_oracle: Arc<dyn TokenPriceOracle>,
}

impl TriggerService {
    /// Create a new trigger service acting for `wallet_address`.
    pub fn new(
        client: JupiterClient,
        base_url: String,
        wallet_address: SolanaAddress,
        price_oracle: Arc<dyn TokenPriceOracle>,
    ) -> Self {
        Self { client, base_url, wallet_address, price_oracle }
    }

    /// Trigger API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an unsigned order-creation transaction.
    ///
    /// Orders worth less than the USD minimum are rejected before any request is made.
    pub async fn create_limit_order(
        &self,
        request: &CreateLimitOrderRequest,
    ) -> Result<CreatedLimitOrder> {
        self.check_minimum_notional(request).await?;

        let referral_account: SolanaAddress = REFERRAL_ACCOUNT.parse()?;
        let fee_account = referral_token_account(&referral_account, &request.output_mint)?;

        let body = CreateOrderBody {
            input_mint: request.input_mint.to_string(),
            output_mint: request.output_mint.to_string(),
            maker: self.wallet_address.to_string(),
            payer: self.wallet_address.to_string(),
            params: CreateOrderParams {
                making_amount: request.making_amount.to_string(),
                taking_amount: request.taking_amount.to_string(),
                slippage_bps: request.slippage_bps.map(|bps| bps.to_string()),
                expired_at: request.expired_at.map(|ts| ts.to_string()),
                fee_bps: REFERRAL_FEE_BPS.to_string(),
            },
            compute_unit_price: COMPUTE_UNIT_PRICE,
            fee_account: fee_account.to_string(),
            referral: Referral::platform(),
        };

        tracing::debug!(
            input_mint = %request.input_mint,
            output_mint = %request.output_mint,
            making_amount = request.making_amount,
            taking_amount = request.taking_amount,
            "Creating limit order"
        );

        let created: CreatedLimitOrder =
            self.client.post_json(&endpoint(&self.base_url, "createOrder"), &body).await?;

        if created.transaction.trim().is_empty() {
            return Err(AppError::Upstream {
                status: 200,
                body: "createOrder returned no transaction".to_string(),
            });
        }

        Ok(created)
    }

    /// Build an unsigned transaction cancelling one order.
    pub async fn cancel_limit_order(&self, order: &SolanaAddress) -> Result<CancelOrderTx> {
        tracing::debug!(order = %order, "Cancelling limit order");

        let body = CancelOrderBody {
            maker: self.wallet_address.to_string(),
            order: order.to_string(),
            compute_unit_price: COMPUTE_UNIT_PRICE,
            referral: Referral::platform(),
        };

        self.client.post_json(&endpoint(&self.base_url, "cancelOrder"), &body).await
    }

    /// Build unsigned transactions cancelling several orders, batched upstream.
    pub async fn cancel_limit_orders(&self, scope: &CancelScope) -> Result<CancelOrdersBatch> {
        let orders = match scope {
            CancelScope::All => {
                tracing::warn!(
                    maker = %self.wallet_address,
                    "No orders listed, cancelling ALL active limit orders"
                );
                None
            }
            CancelScope::Orders(orders) => {
                tracing::debug!(count = orders.len(), "Cancelling limit orders");
                Some(orders.iter().map(ToString::to_string).collect())
            }
        };

        let body = CancelOrdersBody {
            maker: self.wallet_address.to_string(),
            compute_unit_price: COMPUTE_UNIT_PRICE,
            orders,
            referral: Referral::platform(),
        };

        self.client.post_json(&endpoint(&self.base_url, "cancelOrders"), &body).await
    }

    /// List one page of orders for a wallet (default: the configured wallet).
    pub async fn get_limit_orders(
        &self,
        wallet: Option<SolanaAddress>,
        status: OrderStatus,
        input_mint: Option<SolanaAddress>,
        output_mint: Option<SolanaAddress>,
        page: Option<u32>,
    ) -> Result<LimitOrdersPage> {
        let wallet = wallet.unwrap_or(self.wallet_address);
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::invalid_param("page must be 1 or greater"));
        }

        let mut query = vec![
            ("user", wallet.to_string()),
            ("orderStatus", status.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(mint) = input_mint {
            query.push(("inputMint", mint.to_string()));
        }
        if let Some(mint) = output_mint {
            query.push(("outputMint", mint.to_string()));
        }

        tracing::debug!(wallet = %wallet, status = %status, page, "Fetching limit orders");

        let response: TriggerOrdersResponse =
            self.client.get_json(&endpoint(&self.base_url, "getTriggerOrders"), &query).await?;

        let has_more_data = response.has_more_data(page);
        Ok(LimitOrdersPage {
            wallet_address: wallet.to_string(),
            status,
            page,
            orders: response.orders,
            has_more_data,
        })
    }

    /// Reject orders whose USD value is known to be below the minimum.
    ///
    /// The making side is valued first, then the taking side. Orders that cannot
    /// be valued are forwarded and left to the upstream check.
    async fn check_minimum_notional(&self, request: &CreateLimitOrderRequest) -> Result<()> {
        let sides = [
            (&request.input_mint, request.making_amount),
            (&request.output_mint, request.taking_amount),
        ];

        for (mint, amount) in sides {
            let quote = match self.price_oracle.quote(mint).await {
                Ok(Some(quote)) => quote,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(mint = %mint, error = %e, "Price lookup failed");
                    continue;
                }
            };

            let Some(value) = quote.value_of(amount) else {
                continue;
            };

            let minimum = Decimal::from(MIN_ORDER_USD);
            if value < minimum {
                return Err(AppError::invalid_param(format!(
                    "Order value ${} is below the ${MIN_ORDER_USD} minimum",
                    value.round_dp(2)
                )));
            }
            return Ok(());
        }

        tracing::warn!(
            input_mint = %request.input_mint,
            output_mint = %request.output_mint,
            "Could not value order in USD, skipping minimum size check"
        );
        Ok(())
    }
}

impl std::fmt::Debug for TriggerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerService")
            .field("base_url", &self.base_url)
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}
