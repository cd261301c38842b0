// Metrics and observability module
// This file registers the Prometheus series for quote calls, strategy
// outcomes and routing requests
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

pub static QUOTE_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "router_quote_latency_seconds",
        "latency of one-hop quote calls",
        &["provider"]
    )
    .unwrap()
});

pub static QUOTE_FAILURES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_quote_failures_total",
        "failed quote calls by provider and failure kind",
        &["provider", "kind"]
    )
    .unwrap()
});

pub static STRATEGY_OUTCOMES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_strategy_outcomes_total",
        "strategy attempts by outcome",
        &["strategy", "outcome"]
    )
    .unwrap()
});

pub static ROUTE_REQUESTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "router_requests_total",
        "routing requests by result",
        &["result"]
    )
    .unwrap()
});

/// Text exposition of the default registry.
pub fn render() -> String {
    let families = prometheus::gather();
    let mut buf = Vec::new();
    if TextEncoder::new().encode(&families, &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
