// Route selector - the routing entry point
// Validates a request, then walks the strategy cascade in order and returns
// the first route found; later tiers only run when earlier ones find nothing
//
// Numan Thabit 2025 Nov

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::catalog::TokenCatalog;
use crate::errors::RouteError;
use crate::metrics::{ROUTE_REQUESTS, STRATEGY_OUTCOMES};
use crate::router::request::{ResolvedRequest, RoutingRequest, RoutingSettings};
use crate::router::routes::{Route, RouteErrorKind, RouteResult};
use crate::router::strategy::{standard_cascade, Strategy};
use crate::router::validation::validate_request;
use crate::venues::adapter::QuoteProvider;

/// Stateless strategy cascade. Safe to share across concurrent requests.
pub struct RouteSelector {
    catalog: Arc<TokenCatalog>,
    strategies: Vec<Box<dyn Strategy>>,
    settings: RoutingSettings,
}

impl RouteSelector {
    /// Standard cascade over one quote provider.
    pub fn new(
        catalog: Arc<TokenCatalog>,
        provider: Arc<dyn QuoteProvider>,
        settings: RoutingSettings,
    ) -> Self {
        let strategies = standard_cascade(catalog.clone(), provider);
        Self::with_strategies(catalog, strategies, settings)
    }

    pub fn with_strategies(
        catalog: Arc<TokenCatalog>,
        strategies: Vec<Box<dyn Strategy>>,
        settings: RoutingSettings,
    ) -> Self {
        Self {
            catalog,
            strategies,
            settings,
        }
    }

    pub fn catalog(&self) -> &Arc<TokenCatalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }

    /// Route a request, always producing a result value. Panics inside the
    /// search are reported as an internal failure.
    pub async fn route(&self, req: &RoutingRequest) -> RouteResult {
        let outcome = AssertUnwindSafe(self.select_route(req)).catch_unwind().await;
        let result = match outcome {
            Ok(Ok(route)) => RouteResult::found(route),
            Ok(Err(err @ RouteError::InvalidRequest(_))) => {
                RouteResult::failed(RouteErrorKind::InvalidRequest, err.to_string())
            }
            Ok(Err(err @ RouteError::Exhausted { .. })) => {
                RouteResult::failed(RouteErrorKind::NoRoute, err.to_string())
            }
            Err(_) => {
                error!(
                    from = %req.from_token,
                    to = %req.to_token,
                    chain_id = req.chain_id,
                    "route search panicked"
                );
                RouteResult::failed(RouteErrorKind::Internal, "internal routing fault")
            }
        };
        let label = match result.error_kind {
            None => "found",
            Some(RouteErrorKind::InvalidRequest) => "invalid_request",
            Some(RouteErrorKind::NoRoute) => "no_route",
            Some(RouteErrorKind::Internal) => "internal",
        };
        ROUTE_REQUESTS.with_label_values(&[label]).inc();
        result
    }

    /// Validate and search. Only `InvalidRequest` and `Exhausted` escape.
    #[tracing::instrument(skip_all, fields(from = %req.from_token, to = %req.to_token, chain_id = req.chain_id))]
    pub async fn select_route(&self, req: &RoutingRequest) -> Result<Route, RouteError> {
        let resolved = validate_request(&self.catalog, req, &self.settings)?;

        let found = match self.settings.search_budget {
            Some(budget) => match tokio::time::timeout(budget, self.run_cascade(&resolved)).await
            {
                Ok(found) => found,
                Err(_) => {
                    warn!(budget_ms = budget.as_millis() as u64, "route search budget exhausted");
                    None
                }
            },
            None => self.run_cascade(&resolved).await,
        };

        found.ok_or_else(|| RouteError::Exhausted {
            from: resolved.from.symbol.clone(),
            to: resolved.to.symbol.clone(),
            chain_id: resolved.chain_id,
        })
    }

    async fn run_cascade(&self, req: &ResolvedRequest) -> Option<Route> {
        for strategy in &self.strategies {
            let kind = strategy.kind();
            if !strategy.applies(req) {
                debug!(strategy = kind.label(), max_hops = req.max_hops, "strategy skipped by hop limit");
                continue;
            }

            let started = Instant::now();
            match strategy.attempt(req).await {
                Ok(route) => {
                    STRATEGY_OUTCOMES
                        .with_label_values(&[kind.label(), "found"])
                        .inc();
                    info!(
                        strategy = kind.label(),
                        path = %route.path(),
                        hops = route.total_hops,
                        total_output = %route.total_output,
                        total_gas = route.total_gas,
                        confidence = route.confidence,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "selected route"
                    );
                    return Some(route);
                }
                Err(no_route) => {
                    STRATEGY_OUTCOMES
                        .with_label_values(&[kind.label(), "no_route"])
                        .inc();
                    debug!(
                        strategy = kind.label(),
                        reason = %no_route,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "strategy found no route"
                    );
                }
            }
        }
        None
    }
}
