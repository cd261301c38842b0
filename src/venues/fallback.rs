// Fallback quote provider
// Asks an ordered list of quote sources in turn and returns the first quote,
// skipping sources whose circuit breaker is open
//
// Numan Thabit 2025 Nov

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::control::CircuitBreakers;
use crate::errors::QuoteError;
use crate::venues::adapter::{Quote, QuoteProvider, QuoteRequest};

pub struct FallbackProvider {
    id: String,
    providers: Vec<Arc<dyn QuoteProvider>>,
    breakers: CircuitBreakers,
}

impl FallbackProvider {
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>, breakers: CircuitBreakers) -> Self {
        let id = providers
            .iter()
            .map(|p| p.id())
            .collect::<Vec<_>>()
            .join("+");
        Self {
            id,
            providers,
            breakers,
        }
    }
}

#[async_trait]
impl QuoteProvider for FallbackProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote, QuoteError> {
        let mut no_liquidity: Option<QuoteError> = None;
        let mut last_fault: Option<QuoteError> = None;

        for provider in &self.providers {
            let class = provider.id();
            if self.breakers.is_open(class).await {
                debug!(provider = class, "circuit open; skipping provider");
                continue;
            }
            match provider.get_quote(req).await {
                Ok(quote) => {
                    self.breakers.record_success(class).await;
                    return Ok(quote);
                }
                Err(err) if err.is_no_liquidity() => {
                    // an answer, not a fault
                    self.breakers.record_success(class).await;
                    no_liquidity.get_or_insert(err);
                }
                Err(err) => {
                    self.breakers.record_failure(class).await;
                    warn!(provider = class, error = %err, "provider fault; trying next");
                    last_fault = Some(err);
                }
            }
        }

        match (no_liquidity, last_fault) {
            (Some(err), _) => Err(err),
            (None, Some(err)) => Err(err),
            (None, None) => Err(QuoteError::Transport(format!(
                "every provider behind {} is circuit-open",
                self.id
            ))),
        }
    }
}
