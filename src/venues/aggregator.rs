// HTTP aggregator venue
// This file implements a quote provider backed by a 1inch-style swap API,
// with admission control and bounded retries of transient failures
//
// Numan Thabit 2025 Nov

use anyhow::{Context, Result};
use async_trait::async_trait;
use backoff::{future::retry_notify, ExponentialBackoff};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::amount::{apply_slippage, parse_base_units};
use crate::config::ProviderConfig;
use crate::control::AdmissionControl;
use crate::errors::{AmountError, QuoteError};
use crate::venues::adapter::{Quote, QuoteProvider, QuoteRequest};

/// 1inch v6 aggregation router, reported when a response carries no `tx.to`.
pub const DEFAULT_ROUTER: &str = "0x111111125421ca6dc452d289314280a0f8842a65";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    dst_amount: String,
    #[serde(default)]
    gas: Option<u64>,
    #[serde(default)]
    price_impact: Option<f64>,
    #[serde(default)]
    tx: Option<SwapTx>,
}

#[derive(Debug, Deserialize)]
struct SwapTx {
    to: String,
    #[serde(default)]
    data: String,
    #[serde(default)]
    gas: Option<u64>,
}

pub struct HttpAggregator {
    id: String,
    base_url: Url,
    api_key: Option<String>,
    default_router: String,
    client: reqwest::Client,
    admission: AdmissionControl,
    retry_budget: Duration,
}

impl HttpAggregator {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .gzip(true)
            .brotli(true)
            .zstd(true)
            .build()
            .with_context(|| format!("build HTTP client for provider {}", cfg.id))?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            default_router: cfg
                .router_address
                .clone()
                .unwrap_or_else(|| DEFAULT_ROUTER.to_string()),
            client,
            admission: AdmissionControl::new(cfg.max_inflight(), cfg.rate_per_sec),
            retry_budget: cfg.retry_budget(),
        })
    }

    async fn fetch_once(&self, url: &Url, slippage: f64) -> Result<Quote, backoff::Error<QuoteError>> {
        let _permit = self
            .admission
            .acquire()
            .await
            .map_err(backoff::Error::permanent)?;

        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| backoff::Error::transient(QuoteError::Transport(format!("{} send: {e}", self.id))))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| backoff::Error::transient(QuoteError::Transport(format!("{} read body: {e}", self.id))))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }
        parse_swap_response(&self.id, &self.default_router, slippage, &body)
            .map_err(backoff::Error::permanent)
    }
}

#[async_trait]
impl QuoteProvider for HttpAggregator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote, QuoteError> {
        let url = swap_url(&self.base_url, req)?;
        let backoff = ExponentialBackoff {
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(1),
            max_elapsed_time: Some(self.retry_budget),
            multiplier: 2.0,
            ..Default::default()
        };

        retry_notify(
            backoff,
            || self.fetch_once(&url, req.slippage),
            |err: QuoteError, wait: Duration| {
                debug!(
                    provider = %self.id,
                    from = %req.from.symbol,
                    to = %req.to.symbol,
                    error = %err,
                    retry_in_ms = wait.as_millis() as u64,
                    "transient quote failure"
                );
            },
        )
        .await
    }
}

/// Legs starting from the taker's own token go to
/// `{base}/{chainId}/swap?src=&dst=&amount=&from=&slippage=&disableEstimate=true`
/// so the quote carries calldata. Later legs start from a token the taker
/// does not hold yet; the venue rejects those on `/swap` for lack of
/// balance, so they are priced through `{base}/{chainId}/quote`.
pub fn swap_url(base: &Url, req: &QuoteRequest) -> Result<Url, QuoteError> {
    let endpoint = if req.taker_holds_input { "swap" } else { "quote" };
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| QuoteError::Provider(format!("base url {base} cannot carry a path")))?
        .pop_if_empty()
        .push(&req.chain_id.to_string())
        .push(endpoint);
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("src", &req.from.address)
            .append_pair("dst", &req.to.address)
            .append_pair("amount", &req.amount_in.to_string());
        if req.taker_holds_input {
            query
                .append_pair("from", &req.taker)
                .append_pair("slippage", &req.slippage.to_string())
                .append_pair("disableEstimate", "true");
        } else {
            query.append_pair("includeGas", "true");
        }
    }
    Ok(url)
}

/// Map a non-2xx response onto the quote error taxonomy. Rate limiting and
/// server errors are worth retrying; anything else is final.
pub fn classify_failure(status: StatusCode, body: &str) -> backoff::Error<QuoteError> {
    let lowered = body.to_ascii_lowercase();
    let says_no_route = ["liquidity", "no route", "route not found", "insufficient"]
        .iter()
        .any(|needle| lowered.contains(needle));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
            if says_no_route =>
        {
            backoff::Error::permanent(QuoteError::NoLiquidity(truncate(body)))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            backoff::Error::transient(QuoteError::Transport(format!("http {status}")))
        }
        s if s.is_server_error() => {
            backoff::Error::transient(QuoteError::Transport(format!("http {status}")))
        }
        _ => backoff::Error::permanent(QuoteError::Provider(format!(
            "http {status}: {}",
            truncate(body)
        ))),
    }
}

/// Normalize a successful swap response into a [`Quote`].
pub fn parse_swap_response(
    provider: &str,
    default_router: &str,
    slippage: f64,
    body: &str,
) -> Result<Quote, QuoteError> {
    let resp: SwapResponse = serde_json::from_str(body)
        .map_err(|e| QuoteError::Provider(format!("decode swap response: {e}")))?;

    let amount_out = match parse_base_units(&resp.dst_amount) {
        Ok(amount) => amount,
        Err(AmountError::Zero) => {
            return Err(QuoteError::NoLiquidity("venue quoted zero output".to_string()))
        }
        Err(e) => return Err(QuoteError::Provider(format!("dstAmount: {e}"))),
    };
    let amount_out_min = apply_slippage(amount_out, slippage)
        .map_err(|e| QuoteError::Provider(e.to_string()))?;

    let (router_address, execution_data, tx_gas) = match resp.tx {
        Some(tx) => {
            let data = (!tx.data.is_empty()).then_some(tx.data);
            (tx.to, data, tx.gas)
        }
        None => (default_router.to_string(), None, None),
    };

    Ok(Quote {
        provider: provider.to_string(),
        amount_out,
        amount_out_min,
        gas_estimate: tx_gas.or(resp.gas).unwrap_or_default(),
        price_impact: resp.price_impact.unwrap_or_default(),
        router_address,
        execution_data,
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
