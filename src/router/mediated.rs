// Mediated route strategies
// Bridge two tokens through a stablecoin or the chain's gas token: a 2-hop
// composition into the mediator followed by one direct leg out of it
//
// Numan Thabit 2025 Nov

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::TokenCatalog;
use crate::errors::NoRoute;
use crate::router::composer::MultiHopComposer;
use crate::router::direct::DirectResolver;
use crate::router::request::ResolvedRequest;
use crate::router::routes::{Route, StrategyKind};
use crate::router::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediatorFamily {
    /// USDT, USDC, DAI (catalog order)
    Stablecoins,
    /// Native gas token and its wrapped form
    Natives,
}

pub struct MediatedStrategy {
    family: MediatorFamily,
    catalog: Arc<TokenCatalog>,
    composer: Arc<MultiHopComposer>,
    direct: Arc<DirectResolver>,
}

impl MediatedStrategy {
    pub fn new(
        family: MediatorFamily,
        catalog: Arc<TokenCatalog>,
        composer: Arc<MultiHopComposer>,
        direct: Arc<DirectResolver>,
    ) -> Self {
        Self {
            family,
            catalog,
            composer,
            direct,
        }
    }

    fn mediators(&self, chain_id: u64) -> &[String] {
        match self.family {
            MediatorFamily::Stablecoins => self.catalog.stablecoins(),
            MediatorFamily::Natives => self.catalog.native_family(chain_id),
        }
    }
}

#[async_trait]
impl Strategy for MediatedStrategy {
    fn kind(&self) -> StrategyKind {
        match self.family {
            MediatorFamily::Stablecoins => StrategyKind::StablecoinMediated,
            MediatorFamily::Natives => StrategyKind::NativeMediated,
        }
    }

    async fn attempt(&self, req: &ResolvedRequest) -> Result<Route, NoRoute> {
        let mut tried = 0usize;
        for symbol in self.mediators(req.chain_id) {
            let Some(mediator) = self.catalog.resolve(symbol, req.chain_id) else {
                debug!(mediator = %symbol, chain_id = req.chain_id, "mediator not deployed on chain");
                continue;
            };
            if mediator.symbol == req.from.symbol || mediator.symbol == req.to.symbol {
                continue;
            }
            tried += 1;

            let inbound = req.retarget(&req.from, mediator, req.amount_in);
            // the destination never appears mid-route
            let mut legs = match self
                .composer
                .compose_two_hop_excluding(&inbound, &[&req.to])
                .await
            {
                Ok(legs) => legs,
                Err(reason) => {
                    debug!(mediator = %mediator.symbol, reason = %reason, "no path into mediator");
                    continue;
                }
            };

            let bridged = legs.last().map(|leg| leg.amount_out).unwrap_or_default();
            match self.direct.resolve_leg(req, mediator, &req.to, bridged).await {
                Ok(exit) => legs.push(exit),
                Err(reason) => {
                    debug!(mediator = %mediator.symbol, reason = %reason, "no exit from mediator");
                    continue;
                }
            }

            match Route::from_legs(legs, self.kind()) {
                Ok(route) => return Ok(route),
                Err(reason) => {
                    debug!(mediator = %mediator.symbol, reason = %reason, "mediated route rejected");
                }
            }
        }
        Err(NoRoute::new(format!(
            "no {} route from {} to {} ({} mediators tried)",
            self.kind().label(),
            req.from.symbol,
            req.to.symbol,
            tried
        )))
    }
}
