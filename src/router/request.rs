// Routing request types
// Wire-level request as callers send it, the validated form the strategies
// work on, and the engine-wide defaults applied during validation
//
// Numan Thabit 2025 Nov

use serde::Deserialize;
use std::time::Duration;

use crate::catalog::Token;

pub const DEFAULT_MAX_HOPS: u8 = 3;
pub const DEFAULT_SLIPPAGE_PCT: f64 = 1.0;
pub const DEFAULT_SEARCH_BUDGET: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRequest {
    /// Catalog symbol or contract address
    pub from_token: String,
    pub to_token: String,
    /// Decimal string in `from_token` base units
    pub from_amount: String,
    pub from_address: String,
    pub chain_id: u64,
    /// Percent
    #[serde(default)]
    pub slippage: Option<f64>,
    #[serde(default)]
    pub max_hops: Option<u8>,
}

/// Request after validation: endpoints resolved against the catalog, amount
/// parsed, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub from: Token,
    pub to: Token,
    pub amount_in: u128,
    pub from_address: String,
    pub chain_id: u64,
    pub slippage: f64,
    pub max_hops: u8,
}

impl ResolvedRequest {
    /// Sub-request sharing taker, chain and tolerances but with new endpoints.
    pub fn retarget(&self, from: &Token, to: &Token, amount_in: u128) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            amount_in,
            ..self.clone()
        }
    }
}

/// Engine-wide defaults and limits.
#[derive(Debug, Clone)]
pub struct RoutingSettings {
    pub default_slippage: f64,
    pub default_max_hops: u8,
    /// Cumulative deadline for the whole strategy cascade
    pub search_budget: Option<Duration>,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            default_slippage: DEFAULT_SLIPPAGE_PCT,
            default_max_hops: DEFAULT_MAX_HOPS,
            search_budget: Some(DEFAULT_SEARCH_BUDGET),
        }
    }
}
