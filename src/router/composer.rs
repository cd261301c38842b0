// Multi-hop route composer
// Enumerates 2-hop and 3-hop candidate paths through catalog tokens and
// resolves their legs one after another, chaining amounts
//
// Numan Thabit 2025 Nov

use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Token, TokenCatalog};
use crate::errors::NoRoute;
use crate::router::direct::DirectResolver;
use crate::router::request::ResolvedRequest;
use crate::router::routes::SwapLeg;

/// First-fit path search. Candidates are tried strictly in catalog order and
/// the first path whose every leg quotes successfully wins.
pub struct MultiHopComposer {
    catalog: Arc<TokenCatalog>,
    direct: Arc<DirectResolver>,
}

impl MultiHopComposer {
    pub fn new(catalog: Arc<TokenCatalog>, direct: Arc<DirectResolver>) -> Self {
        Self { catalog, direct }
    }

    /// `from -> X -> to` for each candidate X.
    pub async fn compose_two_hop(&self, req: &ResolvedRequest) -> Result<Vec<SwapLeg>, NoRoute> {
        self.compose_two_hop_excluding(req, &[]).await
    }

    /// Same as [`Self::compose_two_hop`] with extra tokens kept out of the
    /// middle position.
    pub async fn compose_two_hop_excluding(
        &self,
        req: &ResolvedRequest,
        avoid: &[&Token],
    ) -> Result<Vec<SwapLeg>, NoRoute> {
        let mut exclude = vec![&req.from, &req.to];
        exclude.extend_from_slice(avoid);
        let candidates = self.catalog.candidates(req.chain_id, &exclude);
        for mid in candidates.iter().copied() {
            match self.resolve_path(req, &[&req.from, mid, &req.to]).await {
                Ok(legs) => return Ok(legs),
                Err(reason) => {
                    debug!(via = %mid.symbol, reason = %reason, "2-hop candidate abandoned");
                }
            }
        }
        Err(NoRoute::new(format!(
            "no 2-hop path from {} to {} across {} candidates",
            req.from.symbol,
            req.to.symbol,
            candidates.len()
        )))
    }

    /// `from -> X -> Y -> to` for every ordered pair of distinct candidates.
    /// Distinctness is by catalog position, not address.
    pub async fn compose_three_hop(&self, req: &ResolvedRequest) -> Result<Vec<SwapLeg>, NoRoute> {
        let candidates = self.catalog.candidates(req.chain_id, &[&req.from, &req.to]);
        for (i, first) in candidates.iter().copied().enumerate() {
            for (j, second) in candidates.iter().copied().enumerate() {
                if i == j {
                    continue;
                }
                match self
                    .resolve_path(req, &[&req.from, first, second, &req.to])
                    .await
                {
                    Ok(legs) => return Ok(legs),
                    Err(reason) => {
                        debug!(
                            via = %first.symbol,
                            then = %second.symbol,
                            reason = %reason,
                            "3-hop candidate abandoned"
                        );
                    }
                }
            }
        }
        Err(NoRoute::new(format!(
            "no 3-hop path from {} to {} across {} candidates",
            req.from.symbol,
            req.to.symbol,
            candidates.len()
        )))
    }

    /// Resolve consecutive legs along `path`; the first failing leg abandons
    /// the whole path.
    async fn resolve_path(
        &self,
        req: &ResolvedRequest,
        path: &[&Token],
    ) -> Result<Vec<SwapLeg>, NoRoute> {
        let mut legs = Vec::with_capacity(path.len().saturating_sub(1));
        let mut amount_in = req.amount_in;
        for pair in path.windows(2) {
            let leg = self.direct.resolve_leg(req, pair[0], pair[1], amount_in).await?;
            amount_in = leg.amount_out;
            legs.push(leg);
        }
        Ok(legs)
    }
}
