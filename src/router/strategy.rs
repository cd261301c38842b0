// Routing strategies
// Each tier of the cascade is a value implementing one contract, so the
// selection policy is an explicit ordered table
//
// Numan Thabit 2025 Nov

use async_trait::async_trait;
use std::sync::Arc;

use crate::catalog::TokenCatalog;
use crate::errors::NoRoute;
use crate::router::composer::MultiHopComposer;
use crate::router::direct::DirectResolver;
use crate::router::mediated::{MediatedStrategy, MediatorFamily};
use crate::router::request::ResolvedRequest;
use crate::router::routes::{Route, StrategyKind};
use crate::venues::adapter::QuoteProvider;

#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Whether the request's hop limit allows this strategy at all.
    fn applies(&self, req: &ResolvedRequest) -> bool {
        req.max_hops >= self.kind().min_hops()
    }

    async fn attempt(&self, req: &ResolvedRequest) -> Result<Route, NoRoute>;
}

pub struct DirectStrategy {
    direct: Arc<DirectResolver>,
}

impl DirectStrategy {
    pub fn new(direct: Arc<DirectResolver>) -> Self {
        Self { direct }
    }
}

#[async_trait]
impl Strategy for DirectStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Direct
    }

    async fn attempt(&self, req: &ResolvedRequest) -> Result<Route, NoRoute> {
        self.direct.attempt(req).await
    }
}

pub struct TwoHopStrategy {
    composer: Arc<MultiHopComposer>,
}

impl TwoHopStrategy {
    pub fn new(composer: Arc<MultiHopComposer>) -> Self {
        Self { composer }
    }
}

#[async_trait]
impl Strategy for TwoHopStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TwoHop
    }

    async fn attempt(&self, req: &ResolvedRequest) -> Result<Route, NoRoute> {
        let legs = self.composer.compose_two_hop(req).await?;
        Route::from_legs(legs, self.kind())
    }
}

pub struct ThreeHopStrategy {
    composer: Arc<MultiHopComposer>,
}

impl ThreeHopStrategy {
    pub fn new(composer: Arc<MultiHopComposer>) -> Self {
        Self { composer }
    }
}

#[async_trait]
impl Strategy for ThreeHopStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ThreeHop
    }

    async fn attempt(&self, req: &ResolvedRequest) -> Result<Route, NoRoute> {
        let legs = self.composer.compose_three_hop(req).await?;
        Route::from_legs(legs, self.kind())
    }
}

/// Direct -> 2-hop -> 3-hop -> stablecoin-mediated -> native-mediated.
pub fn standard_cascade(
    catalog: Arc<TokenCatalog>,
    provider: Arc<dyn QuoteProvider>,
) -> Vec<Box<dyn Strategy>> {
    let direct = Arc::new(DirectResolver::new(provider));
    let composer = Arc::new(MultiHopComposer::new(catalog.clone(), direct.clone()));
    vec![
        Box::new(DirectStrategy::new(direct.clone())),
        Box::new(TwoHopStrategy::new(composer.clone())),
        Box::new(ThreeHopStrategy::new(composer.clone())),
        Box::new(MediatedStrategy::new(
            MediatorFamily::Stablecoins,
            catalog.clone(),
            composer.clone(),
            direct.clone(),
        )),
        Box::new(MediatedStrategy::new(
            MediatorFamily::Natives,
            catalog,
            composer,
            direct,
        )),
    ]
}
