// Direct swap resolver
// Resolves a single hop with exactly one quote call; every other strategy
// builds its legs through here
//
// Numan Thabit 2025 Nov

use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::Token;
use crate::errors::NoRoute;
use crate::metrics::{QUOTE_FAILURES, QUOTE_LATENCY};
use crate::router::request::ResolvedRequest;
use crate::router::routes::{Route, StrategyKind, SwapLeg};
use crate::venues::adapter::{QuoteProvider, QuoteRequest};

pub struct DirectResolver {
    provider: Arc<dyn QuoteProvider>,
}

impl DirectResolver {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Quote one leg. Provider faults are absorbed here and reported as
    /// `NoRoute` so enclosing searches keep going.
    pub async fn resolve_leg(
        &self,
        req: &ResolvedRequest,
        from: &Token,
        to: &Token,
        amount_in: u128,
    ) -> Result<SwapLeg, NoRoute> {
        let quote_req = QuoteRequest {
            from: from.clone(),
            to: to.clone(),
            amount_in,
            chain_id: req.chain_id,
            slippage: req.slippage,
            taker: req.from_address.clone(),
            taker_holds_input: from.same_address(&req.from),
        };
        let provider = self.provider.id();

        let timer = QUOTE_LATENCY.with_label_values(&[provider]).start_timer();
        let outcome = self.provider.get_quote(&quote_req).await;
        timer.observe_duration();

        match outcome {
            Ok(quote) if quote.amount_out == 0 => {
                QUOTE_FAILURES
                    .with_label_values(&[provider, "zero_output"])
                    .inc();
                debug!(
                    provider = provider,
                    from = %from.symbol,
                    to = %to.symbol,
                    "provider returned zero output; treating as no liquidity"
                );
                Err(NoRoute::new(format!(
                    "{} -> {}: zero output",
                    from.symbol, to.symbol
                )))
            }
            Ok(quote) => {
                debug!(
                    provider = provider,
                    from = %from.symbol,
                    to = %to.symbol,
                    amount_in = %amount_in,
                    amount_out = %quote.amount_out,
                    "leg quoted"
                );
                Ok(SwapLeg::from_quote(from, to, amount_in, quote))
            }
            Err(err) => {
                QUOTE_FAILURES
                    .with_label_values(&[provider, err.kind()])
                    .inc();
                if err.is_no_liquidity() {
                    debug!(provider = provider, from = %from.symbol, to = %to.symbol, "no liquidity");
                } else {
                    warn!(
                        provider = provider,
                        from = %from.symbol,
                        to = %to.symbol,
                        error = %err,
                        "quote call failed; abandoning leg"
                    );
                }
                Err(NoRoute::new(format!("{} -> {}: {err}", from.symbol, to.symbol)))
            }
        }
    }

    /// Single-hop route between the request endpoints.
    pub async fn attempt(&self, req: &ResolvedRequest) -> Result<Route, NoRoute> {
        let leg = self.resolve_leg(req, &req.from, &req.to, req.amount_in).await?;
        Route::from_legs(vec![leg], StrategyKind::Direct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::mock::{test_catalog, ScriptedProvider, TAKER};

    fn request(from: &str, to: &str, amount_in: u128, chain_id: u64) -> ResolvedRequest {
        let catalog = test_catalog();
        ResolvedRequest {
            from: catalog.resolve(from, chain_id).unwrap().clone(),
            to: catalog.resolve(to, chain_id).unwrap().clone(),
            amount_in,
            from_address: TAKER.to_string(),
            chain_id,
            slippage: 1.0,
            max_hops: 3,
        }
    }

    #[tokio::test]
    async fn direct_success_has_one_step_and_top_confidence() {
        let provider = Arc::new(ScriptedProvider::new().pool_with("ETH", "USDC", 3_000, 1, 150_000, 0.05));
        let resolver = DirectResolver::new(provider.clone());

        let route = resolver.attempt(&request("ETH", "USDC", 2, 1)).await.unwrap();
        assert_eq!(route.total_hops, 1);
        assert_eq!(route.confidence, 95);
        assert_eq!(route.total_output, 6_000);
        assert_eq!(route.total_gas, 150_000);
        assert_eq!(route.steps[0].execution_data.as_deref(), Some("0x12aa3caf"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn missing_liquidity_is_no_route() {
        let provider = Arc::new(ScriptedProvider::new());
        let resolver = DirectResolver::new(provider.clone());
        let err = resolver.attempt(&request("TWC", "SHIB", 10, 56)).await.unwrap_err();
        assert!(err.reason.contains("TWC -> SHIB"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn provider_fault_is_absorbed() {
        let provider = Arc::new(ScriptedProvider::new().fault("TWC", "SHIB"));
        let resolver = DirectResolver::new(provider);
        let err = resolver.attempt(&request("TWC", "SHIB", 10, 56)).await.unwrap_err();
        assert!(err.reason.contains("transport"));
    }

    #[tokio::test]
    async fn zero_output_quote_is_rejected() {
        // rounds down to zero
        let provider = Arc::new(ScriptedProvider::new().pool("TWC", "SHIB", 1, 1_000));
        let resolver = DirectResolver::new(provider);
        let err = resolver.attempt(&request("TWC", "SHIB", 10, 56)).await.unwrap_err();
        assert!(err.reason.contains("zero output"));
    }
}
