//! USD valuation of token amounts, used for the limit order minimum.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    error::Result,
    services::UltraService,
    solana::{
        constants::{STABLECOIN_DECIMALS, USDC_MINT, USDT_MINT},
        SolanaAddress,
    },
    types::to_decimal,
};

/// USD price and decimals of a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenQuote {
    pub usd_price: Decimal,
    pub decimals: u8,
}

impl TokenQuote {
    /// USD value of `amount` base units. `None` on overflow or out-of-range decimals.
    pub fn value_of(&self, amount: u64) -> Option<Decimal> {
        to_decimal(amount, self.decimals)?.checked_mul(self.usd_price)
    }
}

/// Trait for pricing tokens in USD.
///
/// Lets tests substitute fixed prices for the live search endpoint.
#[async_trait]
pub trait TokenPriceOracle: Send + Sync {
    /// Price a mint. `Ok(None)` when the mint is unknown or has no price.
    async fn quote(&self, mint: &SolanaAddress) -> Result<Option<TokenQuote>>;
}

/// Prices stablecoins locally and everything else through Ultra token search.
#[derive(Debug, Clone)]
pub struct JupiterPriceOracle {
    ultra: UltraService,
}

impl JupiterPriceOracle {
    pub fn new(ultra: UltraService) -> Self {
        Self { ultra }
    }
}

/// USDC and USDT are valued at exactly $1.
fn stablecoin_quote(mint: &SolanaAddress) -> Option<TokenQuote> {
    let mint = mint.to_string();
    (mint == USDC_MINT || mint == USDT_MINT)
        .then_some(TokenQuote { usd_price: Decimal::ONE, decimals: STABLECOIN_DECIMALS })
}

#[async_trait]
impl TokenPriceOracle for JupiterPriceOracle {
    async fn quote(&self, mint: &SolanaAddress) -> Result<Option<TokenQuote>> {
        if let Some(quote) = stablecoin_quote(mint) {
            return Ok(Some(quote));
        }

        let mint_str = mint.to_string();
        let tokens = self.ultra.search_token(&mint_str).await?;

        // Without decimals, base units cannot be scaled.
        Ok(tokens.into_iter().find(|t| t.id == mint_str).and_then(|t| {
            let usd_price = Decimal::try_from(t.usd_price?).ok()?;
            Some(TokenQuote { usd_price, decimals: t.decimals? })
        }))
    }
}
