// Configuration management module
// This file handles loading and parsing of configuration settings
// from environment variables and an optional config file
//
// Numan Thabit 2025 Nov

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::catalog::TokenCatalog;
use crate::router::request::{RoutingSettings, DEFAULT_MAX_HOPS, DEFAULT_SLIPPAGE_PCT};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP API bind address (defaults to 0.0.0.0:8080)
    pub listen_addr: Option<String>,
    /// YAML token catalog; the built-in table is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Primary quote source
    pub provider: ProviderConfig,
    /// Secondary quote source consulted when the primary has no answer
    pub fallback_provider: Option<ProviderConfig>,
    pub routing: Option<RoutingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Identifier reported in legs and metrics, e.g. "oneinch"
    pub id: String,
    /// Aggregator API root, e.g. https://api.1inch.dev/swap/v6.0
    pub base_url: Url,
    pub api_key: Option<String>,
    /// Router reported when the venue omits tx.to
    pub router_address: Option<String>,
    pub timeout_ms: Option<u64>,
    /// Concurrency control
    pub max_inflight: Option<usize>,
    pub rate_per_sec: Option<u32>,
    /// Total time spent retrying transient failures for one quote
    pub retry_budget_ms: Option<u64>,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(10_000))
    }

    pub fn retry_budget(&self) -> Duration {
        Duration::from_millis(self.retry_budget_ms.unwrap_or(3_000))
    }

    pub fn max_inflight(&self) -> usize {
        self.max_inflight.unwrap_or(8)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingConfig {
    pub default_slippage: Option<f64>,
    pub default_max_hops: Option<u8>,
    /// 0 disables the cascade deadline
    pub search_budget_ms: Option<u64>,
}

impl AppConfig {
    /// `ultra-router.{yaml,toml,json}` if present, overridden by `APP__*`.
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("ultra-router").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let raw = self.listen_addr.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR);
        raw.parse()
            .with_context(|| format!("invalid listen address: {raw}"))
    }

    pub fn routing_settings(&self) -> RoutingSettings {
        let routing = self.routing.clone().unwrap_or_default();
        let defaults = RoutingSettings::default();
        RoutingSettings {
            default_slippage: routing.default_slippage.unwrap_or(DEFAULT_SLIPPAGE_PCT),
            default_max_hops: routing.default_max_hops.unwrap_or(DEFAULT_MAX_HOPS),
            search_budget: match routing.search_budget_ms {
                Some(0) => None,
                Some(ms) => Some(Duration::from_millis(ms)),
                None => defaults.search_budget,
            },
        }
    }

    pub fn load_catalog(&self) -> Result<TokenCatalog> {
        match &self.catalog_path {
            Some(path) => TokenCatalog::from_path(path)
                .with_context(|| format!("load token catalog from {}", path.display())),
            None => TokenCatalog::builtin().context("load built-in token catalog"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(routing: Option<RoutingConfig>) -> AppConfig {
        AppConfig {
            listen_addr: None,
            catalog_path: None,
            provider: ProviderConfig {
                id: "oneinch".to_string(),
                base_url: Url::parse("https://api.1inch.dev/swap/v6.0").unwrap(),
                api_key: None,
                router_address: None,
                timeout_ms: None,
                max_inflight: None,
                rate_per_sec: None,
                retry_budget_ms: None,
            },
            fallback_provider: None,
            routing,
        }
    }

    #[test]
    fn routing_defaults_apply() {
        let settings = config(None).routing_settings();
        assert_eq!(settings.default_max_hops, 3);
        assert_eq!(settings.search_budget, Some(Duration::from_secs(30)));
        assert_eq!(config(None).listen_addr().unwrap().port(), 8080);
    }

    #[test]
    fn zero_budget_disables_deadline() {
        let settings = config(Some(RoutingConfig {
            search_budget_ms: Some(0),
            default_max_hops: Some(2),
            ..RoutingConfig::default()
        }))
        .routing_settings();
        assert_eq!(settings.search_budget, None);
        assert_eq!(settings.default_max_hops, 2);
    }

    #[test]
    fn builtin_catalog_is_used_without_path() {
        let catalog = config(None).load_catalog().unwrap();
        assert!(catalog.supports_chain(56));
    }
}
