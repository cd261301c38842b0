// Router module - route discovery plane
// This file wires the request types, routing strategies, the selection
// cascade and its HTTP surface
//
// Numan Thabit 2025 Nov

pub mod api;
pub mod composer;
pub mod direct;
pub mod mediated;
pub mod request;
pub mod routes;
pub mod selector;
pub mod strategy;
pub mod validation;

pub use api::create_api_router;
pub use request::{ResolvedRequest, RoutingRequest, RoutingSettings};
pub use routes::{Route, RouteErrorKind, RouteResult, StrategyKind, SwapLeg};
pub use selector::RouteSelector;
pub use strategy::Strategy;
