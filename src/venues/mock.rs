// Scripted quote provider for tests
//
// Numan Thabit 2025 Nov

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::TokenCatalog;
use crate::errors::QuoteError;
use crate::venues::adapter::{Quote, QuoteProvider, QuoteRequest};

pub(crate) const TAKER: &str = "0x00000000000000000000000000000000000000aa";
pub(crate) const ROUTER: &str = "0x1111111254eeb25477b68fb85ed929f73a960582";

/// BSC tokens in a fixed order, plus two mainnet tokens. DAI and BNB are
/// listed as mediators but not deployed on 56.
pub(crate) const TEST_CATALOG: &str = r#"
stablecoins: [USDT, USDC, DAI]
natives:
  1: [ETH, WETH]
  56: [BNB, WBNB]
tokens:
  - symbol: TWC
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000001", decimals: 9 }
  - symbol: SHIB
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000002", decimals: 18 }
  - symbol: USDT
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000003", decimals: 18 }
      - { chain: 1, address: "0x0000000000000000000000000000000000000013", decimals: 6 }
  - symbol: USDC
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000004", decimals: 18 }
      - { chain: 1, address: "0x0000000000000000000000000000000000000014", decimals: 6 }
  - symbol: WBNB
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000005", decimals: 18 }
  - symbol: CAKE
    deployments:
      - { chain: 56, address: "0x0000000000000000000000000000000000000006", decimals: 18 }
  - symbol: ETH
    deployments:
      - { chain: 1, address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE", decimals: 18 }
"#;

pub(crate) fn test_catalog() -> Arc<TokenCatalog> {
    Arc::new(TokenCatalog::from_yaml_str(TEST_CATALOG).expect("test catalog"))
}

#[derive(Debug, Clone, Copy)]
struct Pool {
    rate_num: u128,
    rate_den: u128,
    gas: u64,
    impact: f64,
    /// Largest input the pool can absorb
    capacity: Option<u128>,
}

/// Deterministic provider: liquidity exists only for scripted pairs.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    pools: HashMap<(String, String), Pool>,
    faults: HashSet<(String, String)>,
    /// Transport faults left before a flaky pair starts quoting
    flaky: Mutex<HashMap<(String, String), usize>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String, u128)>>,
    held: Mutex<Vec<bool>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `amount_out = amount_in * num / den`
    pub(crate) fn pool(self, from: &str, to: &str, num: u128, den: u128) -> Self {
        self.pool_with(from, to, num, den, 100_000, 0.1)
    }

    pub(crate) fn pool_with(
        mut self,
        from: &str,
        to: &str,
        num: u128,
        den: u128,
        gas: u64,
        impact: f64,
    ) -> Self {
        self.pools.insert(
            (from.to_string(), to.to_string()),
            Pool {
                rate_num: num,
                rate_den: den,
                gas,
                impact,
                capacity: None,
            },
        );
        self
    }

    pub(crate) fn capped_pool(mut self, from: &str, to: &str, num: u128, den: u128, cap: u128) -> Self {
        self = self.pool(from, to, num, den);
        if let Some(pool) = self.pools.get_mut(&(from.to_string(), to.to_string())) {
            pool.capacity = Some(cap);
        }
        self
    }

    pub(crate) fn fault(mut self, from: &str, to: &str) -> Self {
        self.faults.insert((from.to_string(), to.to_string()));
        self
    }

    /// Pool that times out on its first `failures` calls, then quotes.
    pub(crate) fn flaky_pool(self, from: &str, to: &str, num: u128, den: u128, failures: usize) -> Self {
        let this = self.pool(from, to, num, den);
        this.flaky
            .lock()
            .unwrap()
            .insert((from.to_string(), to.to_string()), failures);
        this
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(from, to, amount_in)` of every call, in order.
    pub(crate) fn call_log(&self) -> Vec<(String, String, u128)> {
        self.calls.lock().unwrap().clone()
    }

    /// `taker_holds_input` of every call, in order.
    pub(crate) fn held_inputs(&self) -> Vec<bool> {
        self.held.lock().unwrap().clone()
    }

    pub(crate) fn pairs(&self) -> Vec<String> {
        self.call_log()
            .into_iter()
            .map(|(from, to, _)| format!("{from}->{to}"))
            .collect()
    }
}

#[async_trait]
impl QuoteProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn get_quote(&self, req: &QuoteRequest) -> Result<Quote, QuoteError> {
        let key = (req.from.symbol.clone(), req.to.symbol.clone());
        self.calls
            .lock()
            .unwrap()
            .push((key.0.clone(), key.1.clone(), req.amount_in));
        self.held.lock().unwrap().push(req.taker_holds_input);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.faults.contains(&key) {
            return Err(QuoteError::Transport(format!("{}->{} timed out", key.0, key.1)));
        }
        if let Some(left) = self.flaky.lock().unwrap().get_mut(&key) {
            if *left > 0 {
                *left -= 1;
                return Err(QuoteError::Transport(format!("{}->{} timed out", key.0, key.1)));
            }
        }
        match self.pools.get(&key) {
            Some(pool) if pool.capacity.map_or(true, |cap| req.amount_in <= cap) => {
                let amount_out = req.amount_in * pool.rate_num / pool.rate_den;
                Ok(Quote {
                    provider: self.id().to_string(),
                    amount_out,
                    amount_out_min: amount_out,
                    gas_estimate: pool.gas,
                    price_impact: pool.impact,
                    router_address: ROUTER.to_string(),
                    execution_data: Some("0x12aa3caf".to_string()),
                })
            }
            _ => Err(QuoteError::NoLiquidity(format!("{}->{}", key.0, key.1))),
        }
    }
}
