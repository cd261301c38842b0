// Venues module - quote sources
// Provider seam, the HTTP aggregator adapter, and fallback composition
//
// Numan Thabit 2025 Nov

pub mod adapter;
pub mod aggregator;
pub mod fallback;

#[cfg(test)]
pub(crate) mod mock;

pub use adapter::{Quote, QuoteProvider, QuoteRequest};
pub use aggregator::HttpAggregator;
pub use fallback::FallbackProvider;
