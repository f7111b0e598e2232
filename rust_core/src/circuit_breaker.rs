//! Circuit breaker for the external HTTP collaborators.
//!
//! Trips after a run of consecutive failures, rejects calls until the
//! recovery timeout passes, then lets trial calls through (half-open) and
//! closes again after enough of them succeed.

use anyhow::{anyhow, Result};
use log::{info, warn};
use parking_lot::Mutex;
use std::future::Future;
use std::time::{Duration, Instant};

/// States for the API circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCircuitState {
    /// Normal operation - requests are allowed
    Closed,
    /// Circuit is open - requests are blocked
    Open,
    /// Testing if service is recovered
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct ApiCircuitBreakerConfig {
    /// Number of consecutive failures to trip the circuit
    pub failure_threshold: u32,
    /// Duration to wait before attempting recovery
    pub recovery_timeout: Duration,
    /// Number of successful calls in half-open state to close circuit
    pub success_threshold: u32,
}

impl Default for ApiCircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: ApiCircuitState,
    failures: u32,
    half_open_successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Debug)]
pub struct ApiCircuitBreaker {
    name: String,
    config: ApiCircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl ApiCircuitBreaker {
    pub fn new(name: &str, config: ApiCircuitBreakerConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            inner: Mutex::new(BreakerInner {
                state: ApiCircuitState::Closed,
                failures: 0,
                half_open_successes: 0,
                opened_at: None,
            }),
        }
    }

    /// Check if the circuit breaker allows requests
    pub fn is_available(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            ApiCircuitState::Closed | ApiCircuitState::HalfOpen => true,
            ApiCircuitState::Open => {
                let recovered = inner
                    .opened_at
                    .map(|t| t.elapsed() >= self.config.recovery_timeout)
                    .unwrap_or(true);
                if recovered {
                    inner.state = ApiCircuitState::HalfOpen;
                    inner.half_open_successes = 0;
                }
                recovered
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.failures = 0;
        if inner.state == ApiCircuitState::HalfOpen {
            inner.half_open_successes += 1;
            if inner.half_open_successes < self.config.success_threshold {
                return;
            }
            info!(
                "API circuit breaker '{}' closed after {} successful calls",
                self.name, inner.half_open_successes
            );
        }
        inner.state = ApiCircuitState::Closed;
        inner.opened_at = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.failures += 1;
        match inner.state {
            ApiCircuitState::Closed if inner.failures >= self.config.failure_threshold => {
                warn!(
                    "API circuit breaker '{}' OPENED after {} consecutive failures",
                    self.name, inner.failures
                );
                inner.state = ApiCircuitState::Open;
                inner.opened_at = Some(Instant::now());
            }
            ApiCircuitState::HalfOpen => {
                warn!("API circuit breaker '{}' re-OPENED during half-open test", self.name);
                inner.state = ApiCircuitState::Open;
                inner.opened_at = Some(Instant::now());
            }
            _ => {}
        }
    }

    /// Run `call` through the breaker, recording its outcome.
    pub async fn call<T, Fut>(&self, call: impl FnOnce() -> Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        if !self.is_available() {
            return Err(anyhow!("{} API circuit breaker is open", self.name));
        }

        let result = call().await;
        match &result {
            Ok(_) => self.record_success(),
            Err(_) => self.record_failure(),
        }
        result
    }

    pub fn state(&self) -> ApiCircuitState {
        self.inner.lock().state
    }
}
