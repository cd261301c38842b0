// Route types
// This file defines swap legs, composed routes with their derived totals,
// and the strategy tiers that set a route's confidence
//
// Numan Thabit 2025 Nov

use serde::Serialize;

use crate::amount::{self, sum_gas};
use crate::catalog::Token;
use crate::errors::NoRoute;
use crate::venues::adapter::Quote;

/// Strategy tier that produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Direct,
    TwoHop,
    ThreeHop,
    StablecoinMediated,
    NativeMediated,
}

impl StrategyKind {
    /// Heuristic trust score, fixed per tier.
    pub fn confidence(self) -> u8 {
        match self {
            StrategyKind::Direct => 95,
            StrategyKind::TwoHop => 85,
            StrategyKind::StablecoinMediated => 80,
            StrategyKind::ThreeHop => 75,
            StrategyKind::NativeMediated => 70,
        }
    }

    /// Smallest `maxHops` that allows the strategy to run.
    pub fn min_hops(self) -> u8 {
        match self {
            StrategyKind::Direct => 1,
            StrategyKind::TwoHop => 2,
            StrategyKind::ThreeHop
            | StrategyKind::StablecoinMediated
            | StrategyKind::NativeMediated => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Direct => "direct",
            StrategyKind::TwoHop => "two_hop",
            StrategyKind::ThreeHop => "three_hop",
            StrategyKind::StablecoinMediated => "stablecoin_mediated",
            StrategyKind::NativeMediated => "native_mediated",
        }
    }
}

/// One hop of a route, built from a single provider quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
    pub index: usize,
    pub from_token: Token,
    pub to_token: Token,
    pub provider_id: String,
    pub router_address: String,
    #[serde(with = "amount::as_string")]
    pub amount_in: u128,
    #[serde(with = "amount::as_string")]
    pub amount_out: u128,
    #[serde(with = "amount::as_string")]
    pub amount_out_min: u128,
    pub price_impact: f64,
    pub gas_estimate: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_data: Option<String>,
}

impl SwapLeg {
    pub fn from_quote(from: &Token, to: &Token, amount_in: u128, quote: Quote) -> Self {
        Self {
            index: 0,
            from_token: from.clone(),
            to_token: to.clone(),
            provider_id: quote.provider,
            router_address: quote.router_address,
            amount_in,
            amount_out: quote.amount_out,
            amount_out_min: quote.amount_out_min,
            price_impact: quote.price_impact,
            gas_estimate: quote.gas_estimate,
            execution_data: quote.execution_data,
        }
    }
}

/// A fully composed route. Only constructed through [`Route::from_legs`],
/// which enforces continuity and derives every total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub steps: Vec<SwapLeg>,
    #[serde(with = "amount::as_string")]
    pub total_output: u128,
    pub total_gas: u64,
    pub total_price_impact: f64,
    pub total_hops: usize,
    pub confidence: u8,
    pub strategy: StrategyKind,
}

impl Route {
    pub fn from_legs(mut steps: Vec<SwapLeg>, strategy: StrategyKind) -> Result<Self, NoRoute> {
        let Some(last) = steps.last() else {
            return Err(NoRoute::new("route has no legs"));
        };
        let total_output = last.amount_out;

        if let Some((position, pair)) = steps
            .windows(2)
            .enumerate()
            .find(|(_, pair)| pair[0].to_token != pair[1].from_token)
        {
            return Err(NoRoute::new(format!(
                "leg {} ends in {} but next leg starts from {}",
                position, pair[0].to_token.symbol, pair[1].from_token.symbol
            )));
        }

        let total_gas = sum_gas(steps.iter().map(|leg| leg.gas_estimate))
            .ok_or_else(|| NoRoute::new("total gas estimate overflows u64"))?;
        let total_price_impact = steps.iter().map(|leg| leg.price_impact).sum();

        for (index, leg) in steps.iter_mut().enumerate() {
            leg.index = index;
        }

        Ok(Self {
            total_hops: steps.len(),
            steps,
            total_output,
            total_gas,
            total_price_impact,
            confidence: strategy.confidence(),
            strategy,
        })
    }

    /// Symbols along the path, e.g. `TWC -> WBNB -> USDT -> SHIB`.
    pub fn path(&self) -> String {
        let mut symbols: Vec<&str> = self
            .steps
            .iter()
            .map(|leg| leg.from_token.symbol.as_str())
            .collect();
        if let Some(last) = self.steps.last() {
            symbols.push(last.to_token.symbol.as_str());
        }
        symbols.join(" -> ")
    }

    /// Final step, the one an execution component submits.
    pub fn final_step(&self) -> Option<&SwapLeg> {
        self.steps.last()
    }
}

/// Error classes reported to callers alongside a failed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteErrorKind {
    InvalidRequest,
    NoRoute,
    Internal,
}

/// Outcome of one routing call: exactly one route or one failure reason.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<RouteErrorKind>,
}

impl RouteResult {
    pub fn found(route: Route) -> Self {
        Self {
            success: true,
            route: Some(route),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(kind: RouteErrorKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            route: None,
            error: Some(error.into()),
            error_kind: Some(kind),
        }
    }
}
