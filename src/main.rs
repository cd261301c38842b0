use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ultra_router::config::AppConfig;
use ultra_router::control::CircuitBreakers;
use ultra_router::router::{create_api_router, RouteSelector};
use ultra_router::venues::{FallbackProvider, HttpAggregator, QuoteProvider};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal router error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration")?;
    let catalog = Arc::new(config.load_catalog()?);
    let settings = config.routing_settings();

    let primary: Arc<dyn QuoteProvider> = Arc::new(
        HttpAggregator::new(&config.provider)
            .with_context(|| format!("initialize provider {}", config.provider.id))?,
    );
    let provider: Arc<dyn QuoteProvider> = match &config.fallback_provider {
        Some(fallback_cfg) => {
            let secondary: Arc<dyn QuoteProvider> = Arc::new(
                HttpAggregator::new(fallback_cfg)
                    .with_context(|| format!("initialize provider {}", fallback_cfg.id))?,
            );
            Arc::new(FallbackProvider::new(
                vec![primary, secondary],
                CircuitBreakers::default(),
            ))
        }
        None => {
            warn!("fallback provider not configured; quoting from a single source");
            primary
        }
    };

    let chains = catalog.chains();
    let selector = Arc::new(RouteSelector::new(catalog, provider.clone(), settings));

    let addr = config.listen_addr()?;
    let app = create_api_router(selector.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!(
        address = %addr,
        provider = provider.id(),
        chains = ?chains,
        max_hops = selector.settings().default_max_hops,
        search_budget_ms = ?selector.settings().search_budget.map(|b| b.as_millis()),
        "ultra-router online"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind API server address {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl_c listener error");
        // keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

fn init_tracing() -> Result<()> {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
