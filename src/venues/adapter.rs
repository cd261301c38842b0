// Venue adapter module
// This file defines the quote provider seam every liquidity source is
// integrated through, and the normalized quote it must return
//
// Numan Thabit 2025 Nov

use async_trait::async_trait;

use crate::catalog::Token;
use crate::errors::QuoteError;

/// One-hop quote request handed to a provider.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub from: Token,
    pub to: Token,
    /// Input in `from` base units
    pub amount_in: u128,
    pub chain_id: u64,
    /// Slippage tolerance in percent
    pub slippage: f64,
    /// Address that would execute the swap
    pub taker: String,
    /// The taker already holds `from`. False for legs that start from an
    /// intermediate token, which venues can price but not build calldata for.
    pub taker_holds_input: bool,
}

/// Normalized provider quote for a single leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub provider: String,
    pub amount_out: u128,
    pub amount_out_min: u128,
    pub gas_estimate: u64,
    /// Percent
    pub price_impact: f64,
    pub router_address: String,
    /// Hex calldata for the router, when the venue returns it
    pub execution_data: Option<String>,
}

/// Quote source interface (aggregator APIs, on-chain router queries).
///
/// Implementations must report both "no liquidity" and "call failed" as
/// `Err`, never as a zero-output quote.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier used in legs, logs and metrics.
    fn id(&self) -> &str;

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote, QuoteError>;
}
