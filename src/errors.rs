// Error types and error handling module
// This file defines the typed failures that flow through quote lookups,
// strategy attempts, and the routing entry point
//
// Numan Thabit 2025 Nov

use thiserror::Error;

/// Failure of a single one-hop quote lookup.
#[derive(Debug, Clone, Error)]
pub enum QuoteError {
    /// The venue has no liquidity for the pair at the requested size.
    #[error("no liquidity: {0}")]
    NoLiquidity(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider error: {0}")]
    Provider(String),
}

impl QuoteError {
    pub fn is_no_liquidity(&self) -> bool {
        matches!(self, QuoteError::NoLiquidity(_))
    }

    /// Metrics label for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::NoLiquidity(_) => "no_liquidity",
            QuoteError::Transport(_) => "transport",
            QuoteError::Provider(_) => "provider",
        }
    }
}

/// A strategy, candidate path, or leg found nothing usable. Expected and common.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct NoRoute {
    pub reason: String,
}

impl NoRoute {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failures that cross the routing engine boundary.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("no route found from {from} to {to} on chain {chain_id}")]
    Exhausted {
        from: String,
        to: String,
        chain_id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount {0:?} is not a non-negative integer in base units")]
    NotAnInteger(String),
    #[error("amount {0} does not fit in 128 bits")]
    Overflow(String),
    #[error("amount must be greater than zero")]
    Zero,
    #[error("slippage {0} must be between 0 and 50 percent")]
    Slippage(f64),
}
