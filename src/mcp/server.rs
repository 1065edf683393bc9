//! MCP server implementation.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParam, RawResource,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo,
    },
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Serialize;

use crate::{
    config::{Config, Network, SubmissionMode},
    error::AppError,
    jupiter::JupiterClient,
    services::{
        CancelScope, ExecutionService, JupiterPriceOracle, TriggerService, UltraService,
    },
    solana::{SolanaAddress, SolanaRpcClient, WalletManager},
    types::{
        CreateLimitOrderRequest, OrderStatus, QuoteRequest, ToolResponse,
        UnsignedTransactionEnvelope, Venue,
    },
};

/// URI of the wallet information resource.
pub const WALLET_INFO_URI: &str = "wallet://info";

/// Get current Unix timestamp in seconds.
fn current_timestamp() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}

/// Wrap a service result in the tool response envelope.
fn respond<T: Serialize>(result: crate::error::Result<T>) -> Result<String, McpError> {
    if let Err(e) = &result {
        tracing::warn!(code = ?e.kind(), error = %e, "Tool call failed");
    }
    serde_json::to_string_pretty(&ToolResponse::from(result))
        .map_err(|e| McpError::internal_error(e.to_string(), None))
}

fn parse_optional_address(
    field: &str,
    value: Option<&str>,
) -> crate::error::Result<Option<SolanaAddress>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| SolanaAddress::parse_field(field, v))
        .transpose()
}

/// Jupiter MCP Server.
///
/// Exposes Jupiter Ultra swaps and Trigger limit orders as MCP tools, signing
/// with the configured Solana wallet.
#[derive(Clone)]
pub struct JupiterServer {
    ultra_service: UltraService,
    trigger_service: TriggerService,
    execution_service: ExecutionService,
    wallet: Arc<WalletManager>,
    network: Network,
    rpc_url: String,
    submission_mode: SubmissionMode,
    tool_router: ToolRouter<Self>,
}

impl JupiterServer {
    /// Create a new Jupiter MCP Server.
    ///
    /// No network calls are made here; every tool call talks to the APIs directly.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!(network = %config.network, "Initializing Jupiter MCP Server");

        let wallet = Arc::new(WalletManager::from_private_key(&config.private_key)?);

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        let client = JupiterClient::new(http.clone(), config.request_timeout);
        let rpc = SolanaRpcClient::new(http, config.rpc_url.clone(), config.request_timeout);

        let ultra_service =
            UltraService::new(client.clone(), config.ultra_api_url.clone(), wallet.address());
        let price_oracle = Arc::new(JupiterPriceOracle::new(ultra_service.clone()));
        let trigger_service = TriggerService::new(
            client.clone(),
            config.trigger_api_url.clone(),
            wallet.address(),
            price_oracle,
        );
        let execution_service = ExecutionService::new(
            client,
            rpc,
            wallet.clone(),
            config.ultra_api_url,
            config.trigger_api_url,
            config.submission_mode,
        );

        tracing::info!(
            address = %wallet.address(),
            submission_mode = config.submission_mode.as_str(),
            "Jupiter MCP Server initialized successfully"
        );

        Ok(Self {
            ultra_service,
            trigger_service,
            execution_service,
            wallet,
            network: config.network,
            rpc_url: config.rpc_url,
            submission_mode: config.submission_mode,
            tool_router: Self::tool_router(),
        })
    }

    /// Address of the configured wallet.
    pub fn wallet_address(&self) -> SolanaAddress {
        self.wallet.address()
    }

    /// Names of tools that sign and broadcast transactions.
    ///
    /// Hosts should ask for confirmation before calling these.
    pub fn mutating_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .filter(|tool| {
                tool.annotations.as_ref().is_some_and(|a| a.destructive_hint == Some(true))
            })
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Text of the `wallet://info` resource.
    pub fn wallet_info(&self) -> String {
        format!(
            "Wallet Configuration:\n\
             - Address: {}\n\
             - Network: {}\n\
             - RPC URL: {}\n\
             - Submission mode: {}\n",
            self.wallet.address(),
            self.network,
            self.rpc_url,
            self.submission_mode.as_str()
        )
    }
}

/// Input parameters for the get_swap_quote tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetSwapQuoteInput {
    /// Input token mint address (e.g., SOL: "So11111111111111111111111111111111111111112").
    pub input_mint: String,
    /// Output token mint address (e.g., USDC: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").
    pub output_mint: String,
    /// Amount of the input token in base units (e.g., "1000000" lamports = 0.001 SOL).
    pub amount: String,
}

/// Input parameters for the execute tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct ExecuteTransactionInput {
    /// Base64 unsigned transaction, exactly as returned by the quote or order tool.
    pub transaction: String,
    /// Request ID returned alongside the transaction.
    pub request_id: String,
}

/// Input parameters for the get_balances tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetBalancesInput {
    /// Wallet address to query. Defaults to the configured wallet.
    #[serde(default)]
    pub wallet_address: Option<String>,
}

/// Input parameters for the get_shield tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetShieldInput {
    /// Comma-separated list of token mint addresses.
    pub mints: String,
}

/// Input parameters for the search_token tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchTokenInput {
    /// Token symbol, name or mint address (e.g., "JUP").
    pub query: String,
}

/// Input parameters for the create_limit_order tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateLimitOrderInput {
    /// Mint of the token to sell.
    pub input_mint: String,
    /// Mint of the token to buy.
    pub output_mint: String,
    /// Amount to sell, in base units of the input token.
    pub making_amount: String,
    /// Amount to receive, in base units of the output token.
    pub taking_amount: String,
    /// Slippage tolerance in basis points (0-10000). 0 means exact price.
    #[serde(default)]
    pub slippage_bps: Option<u32>,
    /// Expiry as a Unix timestamp in seconds. Must be in the future.
    #[serde(default)]
    pub expired_at: Option<i64>,
}

/// Input parameters for the cancel_limit_order tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct CancelLimitOrderInput {
    /// Order account address.
    pub order: String,
}

/// Input parameters for the cancel_limit_orders tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct CancelLimitOrdersInput {
    /// Order account addresses. Empty or omitted cancels ALL active orders.
    #[serde(default)]
    pub orders: Option<Vec<String>>,
}

/// Input parameters for the get_limit_orders tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
pub struct GetLimitOrdersInput {
    /// Wallet address to query. Defaults to the configured wallet.
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// "active" or "history". Defaults to "active".
    #[serde(default)]
    pub status: Option<String>,
    /// Only orders selling this mint.
    #[serde(default)]
    pub input_mint: Option<String>,
    /// Only orders buying this mint.
    #[serde(default)]
    pub output_mint: Option<String>,
    /// Page number, starting at 1. Pages hold 10 orders.
    #[serde(default)]
    pub page: Option<u32>,
}

#[tool_router]
impl JupiterServer {
    /// Get a swap quote with an unsigned transaction from Jupiter Ultra.
    #[tool(
        description = "Get a swap quote and unsigned transaction from Jupiter Ultra (FREE, nothing is executed). Pass the returned transaction and request_id to execute_swap_transaction.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn get_swap_quote(
        &self,
        Parameters(input): Parameters<GetSwapQuoteInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            input_mint = %input.input_mint,
            output_mint = %input.output_mint,
            amount = %input.amount,
            "get_swap_quote called"
        );

        let result = async {
            let request = QuoteRequest::parse(&input.input_mint, &input.output_mint, &input.amount)?;
            self.ultra_service.get_swap_quote(&request).await
        }
        .await;

        respond(result)
    }

    /// Sign and execute a swap transaction.
    #[tool(
        description = "Sign and execute a swap transaction from get_swap_quote (PAID, irreversible, moves funds on-chain). Never retried automatically: on failure, re-quote instead of resubmitting.",
        annotations(destructive_hint = true, read_only_hint = false, open_world_hint = true)
    )]
    pub async fn execute_swap_transaction(
        &self,
        Parameters(input): Parameters<ExecuteTransactionInput>,
    ) -> Result<String, McpError> {
        tracing::info!(request_id = %input.request_id, "execute_swap_transaction called");

        let envelope = UnsignedTransactionEnvelope::new(input.transaction, input.request_id);
        respond(self.execution_service.sign_and_submit(&envelope, Venue::Ultra).await)
    }

    /// Get token balances for a wallet.
    #[tool(
        description = "Get token balances for a wallet (FREE). Defaults to the configured wallet.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn get_balances(
        &self,
        Parameters(input): Parameters<GetBalancesInput>,
    ) -> Result<String, McpError> {
        tracing::info!(wallet = ?input.wallet_address, "get_balances called");

        let result = async {
            let wallet = parse_optional_address("wallet_address", input.wallet_address.as_deref())?;
            self.ultra_service.get_balances(wallet).await
        }
        .await;

        respond(result)
    }

    /// Get token security warnings.
    #[tool(
        description = "Get security warnings for tokens (FREE). Takes a comma-separated list of mint addresses.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn get_shield(
        &self,
        Parameters(input): Parameters<GetShieldInput>,
    ) -> Result<String, McpError> {
        tracing::info!(mints = %input.mints, "get_shield called");

        respond(self.ultra_service.get_shield(&input.mints).await)
    }

    /// Search tokens.
    #[tool(
        description = "Search tokens by symbol, name or mint address (FREE).",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn search_token(
        &self,
        Parameters(input): Parameters<SearchTokenInput>,
    ) -> Result<String, McpError> {
        tracing::info!(query = %input.query, "search_token called");

        respond(self.ultra_service.search_token(&input.query).await)
    }

    /// Build an unsigned limit order transaction.
    #[tool(
        description = "Create an unsigned limit order transaction via Jupiter Trigger (FREE, nothing is executed). Orders below $5 USD are rejected. Pass the returned transaction and request_id to execute_limit_order.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn create_limit_order(
        &self,
        Parameters(input): Parameters<CreateLimitOrderInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            input_mint = %input.input_mint,
            output_mint = %input.output_mint,
            making_amount = %input.making_amount,
            taking_amount = %input.taking_amount,
            slippage_bps = ?input.slippage_bps,
            expired_at = ?input.expired_at,
            "create_limit_order called"
        );

        let result = async {
            let request = CreateLimitOrderRequest::parse(
                &input.input_mint,
                &input.output_mint,
                &input.making_amount,
                &input.taking_amount,
                input.slippage_bps,
                input.expired_at,
                current_timestamp(),
            )?;
            self.trigger_service.create_limit_order(&request).await
        }
        .await;

        respond(result)
    }

    /// Sign and execute a limit order transaction.
    #[tool(
        description = "Sign and execute a limit order transaction from create_limit_order, cancel_limit_order or cancel_limit_orders (PAID, irreversible). Never retried automatically.",
        annotations(destructive_hint = true, read_only_hint = false, open_world_hint = true)
    )]
    pub async fn execute_limit_order(
        &self,
        Parameters(input): Parameters<ExecuteTransactionInput>,
    ) -> Result<String, McpError> {
        tracing::info!(request_id = %input.request_id, "execute_limit_order called");

        let envelope = UnsignedTransactionEnvelope::new(input.transaction, input.request_id);
        respond(self.execution_service.sign_and_submit(&envelope, Venue::Trigger).await)
    }

    /// Build an unsigned transaction cancelling one limit order.
    #[tool(
        description = "Create an unsigned transaction cancelling one limit order (FREE until executed with execute_limit_order).",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn cancel_limit_order(
        &self,
        Parameters(input): Parameters<CancelLimitOrderInput>,
    ) -> Result<String, McpError> {
        tracing::info!(order = %input.order, "cancel_limit_order called");

        let result = async {
            let order = SolanaAddress::parse_field("order", &input.order)?;
            self.trigger_service.cancel_limit_order(&order).await
        }
        .await;

        respond(result)
    }

    /// Build unsigned transactions cancelling several limit orders.
    #[tool(
        description = "Create unsigned transactions cancelling several limit orders, batched 5 per transaction (FREE until executed). WARNING: an empty or omitted orders list cancels ALL active orders of the configured wallet.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn cancel_limit_orders(
        &self,
        Parameters(input): Parameters<CancelLimitOrdersInput>,
    ) -> Result<String, McpError> {
        tracing::info!(orders = ?input.orders, "cancel_limit_orders called");

        let result = async {
            let scope = CancelScope::from_requested(input.orders)?;
            self.trigger_service.cancel_limit_orders(&scope).await
        }
        .await;

        respond(result)
    }

    /// List limit orders.
    #[tool(
        description = "Get active or historical limit orders for a wallet (FREE). Paginated, 10 orders per page; check has_more_data.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    pub async fn get_limit_orders(
        &self,
        Parameters(input): Parameters<GetLimitOrdersInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            wallet = ?input.wallet_address,
            status = ?input.status,
            page = ?input.page,
            "get_limit_orders called"
        );

        let result = async {
            let wallet = parse_optional_address("wallet_address", input.wallet_address.as_deref())?;
            let status = input
                .status
                .as_deref()
                .map(str::parse::<OrderStatus>)
                .transpose()?
                .unwrap_or_default();
            let input_mint = parse_optional_address("input_mint", input.input_mint.as_deref())?;
            let output_mint = parse_optional_address("output_mint", input.output_mint.as_deref())?;

            self.trigger_service
                .get_limit_orders(wallet, status, input_mint, output_mint, input.page)
                .await
        }
        .await;

        respond(result)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for JupiterServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().enable_resources().build(),
            server_info: Implementation {
                name: "jupiter-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Jupiter MCP Server. FREE tools query quotes, balances, tokens and limit orders, \
                 or build unsigned transactions. PAID tools (execute_swap_transaction, \
                 execute_limit_order) sign with the configured wallet and broadcast on-chain. \
                 Every mutating call carries a fixed 2.55% referral fee."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![RawResource::new(
            WALLET_INFO_URI,
            "wallet-info".to_string(),
        )
        .no_annotation()]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if request.uri != WALLET_INFO_URI {
            return Err(McpError::resource_not_found(
                format!("unknown resource: {}", request.uri),
                None,
            ));
        }

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(self.wallet_info(), WALLET_INFO_URI)],
        })
    }
}
