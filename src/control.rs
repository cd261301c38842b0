// Control plane: admission control and circuit breakers for quote sources
//
// Caps in-flight quote calls and their per-second rate, and tracks per-provider
// sliding-window failure rates so a failing source can be skipped for a while.
//
// Numan Thabit 2025 Nov

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::errors::QuoteError;

#[derive(Clone)]
pub struct AdmissionControl {
    max_inflight: Arc<Semaphore>,
    // allow up to rate_per_sec calls within a 1s sliding window
    limiter: Arc<Mutex<RateLimiter>>,
}

struct RateLimiter {
    rate_per_sec: u32,
    timestamps: VecDeque<Instant>,
    window: Duration,
}

impl RateLimiter {
    /// Record a call if the window has room, otherwise report how long to wait.
    fn try_admit(&mut self, now: Instant) -> Option<Duration> {
        while let Some(front) = self.timestamps.front() {
            if now.duration_since(*front) >= self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
        if (self.timestamps.len() as u32) < self.rate_per_sec {
            self.timestamps.push_back(now);
            return None;
        }
        let oldest = self.timestamps.front().copied().unwrap_or(now);
        Some(self.window.saturating_sub(now.duration_since(oldest)))
    }
}

impl AdmissionControl {
    pub fn new(max_inflight: usize, rate_per_sec: Option<u32>) -> Self {
        let limiter = RateLimiter {
            rate_per_sec: rate_per_sec.unwrap_or(20).max(1),
            timestamps: VecDeque::with_capacity(64),
            window: Duration::from_secs(1),
        };
        Self {
            max_inflight: Arc::new(Semaphore::new(max_inflight.max(1))),
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Acquire a permit respecting the rate limit and the in-flight cap.
    pub async fn acquire(&self) -> Result<AdmissionPermit, QuoteError> {
        loop {
            let wait = self.limiter.lock().await.try_admit(Instant::now());
            match wait {
                None => break,
                Some(delay) => tokio::time::sleep(delay.max(Duration::from_millis(5))).await,
            }
        }
        let permit = self
            .max_inflight
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| QuoteError::Transport("admission control closed".to_string()))?;
        Ok(AdmissionPermit { _permit: permit })
    }

    pub fn available(&self) -> usize {
        self.max_inflight.available_permits()
    }
}

pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

/// Thresholds shared by every breaker in a [`CircuitBreakers`] set.
#[derive(Debug, Clone)]
pub struct BreakerPolicy {
    pub max_window: usize,
    /// Failure rate (0.0-1.0) that opens the breaker
    pub threshold: f32,
    pub min_samples: usize,
    pub open_cooldown: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            max_window: 50,
            threshold: 0.5,
            min_samples: 10,
            open_cooldown: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct CircuitBreakers {
    policy: BreakerPolicy,
    inner: Arc<Mutex<HashMap<String, Breaker>>>,
}

#[derive(Default)]
struct Breaker {
    window: VecDeque<bool>, // true=failure, false=success
    open_until: Option<Instant>,
}

impl Default for CircuitBreakers {
    fn default() -> Self {
        Self::new(BreakerPolicy::default())
    }
}

impl CircuitBreakers {
    pub fn new(policy: BreakerPolicy) -> Self {
        Self {
            policy,
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn is_open(&self, class: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(b) = inner.get_mut(class) else {
            return false;
        };
        match b.open_until {
            Some(until) if Instant::now() < until => true,
            Some(_) => {
                // half-open: start over with a fresh window
                b.open_until = None;
                b.window.clear();
                false
            }
            None => false,
        }
    }

    pub async fn record_success(&self, class: &str) {
        self.record(class, false).await;
    }

    pub async fn record_failure(&self, class: &str) {
        self.record(class, true).await;
    }

    async fn record(&self, class: &str, failure: bool) {
        let mut inner = self.inner.lock().await;
        let b = inner.entry(class.to_string()).or_default();
        if b.window.len() >= self.policy.max_window {
            b.window.pop_front();
        }
        b.window.push_back(failure);

        let samples = b.window.len();
        if samples >= self.policy.min_samples {
            let fails = b.window.iter().filter(|x| **x).count();
            let rate = fails as f32 / samples as f32;
            if rate >= self.policy.threshold && b.open_until.is_none() {
                b.open_until = Some(Instant::now() + self.policy.open_cooldown);
                debug!(class = %class, rate = rate, samples = samples, "circuit opened");
            }
        }
    }
}
