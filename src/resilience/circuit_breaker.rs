//! Circuit breaker guarding the primary provider.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: provider assumed down, calls fail fast
//! - Half-Open: one trial call testing recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures reach the threshold
//! Open → Half-Open: reset timeout elapsed, checked lazily on the next call
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails (opened_at refreshed)
//! ```
//!
//! # Design Decisions
//! - Fail fast in Open state; the wrapped call is never attempted
//! - Single trial in Half-Open; concurrent callers keep getting rejected
//!   until the trial resolves
//! - The state lock is never held across the provider call itself
//! - No background timer; expiry is checked on the call path

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::resilience::observer::BreakerObserver;

/// Current position of the breaker's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls are rejected without being attempted.
    Open,
    /// A single trial call is testing recovery.
    HalfOpen,
}

impl CircuitState {
    /// Human-oriented rendering for status payloads.
    pub fn description(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed (primary in use)",
            CircuitState::Open => "open (secondary in use)",
            CircuitState::HalfOpen => "half-open (testing primary)",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Breaker tuning, fixed at construction.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit trips.
    pub failure_threshold: u32,
    /// Time spent Open before a trial call is allowed.
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout: Duration::from_secs(15),
        }
    }
}

/// Why a guarded call did not return a provider result.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Rejected without attempting the provider. Callers must not count
    /// this as a provider failure.
    #[error("circuit breaker '{name}' is open, call rejected")]
    BreakerOpen { name: String },

    /// The provider was attempted and failed; the breaker has already
    /// recorded the failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Immutable view of the breaker for status reporting.
#[derive(Debug, Clone)]
pub struct BreakerSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// How a call was let through `guard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Pass,
    Trial,
    Rejected,
}

/// Circuit breaker for one guarded provider.
///
/// Shared state lives behind a single mutex; `guard` locks only to admit
/// the call and again to commit its outcome, never across the provider
/// I/O itself.
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    inner: Mutex<BreakerState>,
    observer: Arc<dyn BreakerObserver>,
}

impl CircuitBreaker {
    pub fn new(
        name: impl Into<String>,
        config: BreakerConfig,
        observer: Arc<dyn BreakerObserver>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
            observer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap().state
    }

    /// Run one provider call under the breaker.
    ///
    /// Returns the call's result on success. Fails with
    /// [`GuardError::BreakerOpen`] when the circuit rejects the call
    /// untried, or with the propagated [`ProviderError`] after recording
    /// the failure. Every exit commits a determinate state transition.
    pub async fn guard<T, F, Fut>(&self, call: F) -> Result<T, GuardError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let admission = self.admit();
        let trial = match admission {
            Admission::Rejected => {
                return Err(GuardError::BreakerOpen {
                    name: self.name.clone(),
                })
            }
            Admission::Pass => false,
            Admission::Trial => true,
        };

        // If the caller is dropped mid-trial, the permit releases the
        // trial slot so the breaker is not wedged in HalfOpen.
        let mut permit = if trial {
            Some(TrialPermit {
                breaker: self,
                armed: true,
            })
        } else {
            None
        };

        let outcome = call().await;

        if let Some(permit) = permit.as_mut() {
            permit.armed = false;
        }

        match outcome {
            Ok(value) => {
                self.record_success(trial);
                Ok(value)
            }
            Err(e) => {
                self.record_failure(trial);
                Err(e.into())
            }
        }
    }

    /// Unconditionally close the circuit and zero its failure memory.
    ///
    /// Administrative override only. Unsafe if the guarded provider has
    /// not actually recovered: the next calls will fail against it until
    /// the threshold trips the breaker again.
    pub fn force_close(&self) {
        let old = {
            let mut inner = self.inner.lock().unwrap();
            let old = inner.state;
            inner.state = CircuitState::Closed;
            inner.consecutive_failures = 0;
            inner.opened_at = None;
            inner.trial_in_flight = false;
            old
        };
        if old != CircuitState::Closed {
            self.observer
                .on_state_change(&self.name, old, CircuitState::Closed);
        }
    }

    /// Immutable view for status reporting; never mutates.
    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.inner.lock().unwrap();
        BreakerSnapshot {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            failure_threshold: self.config.failure_threshold,
            reset_timeout: self.config.reset_timeout,
        }
    }

    fn admit(&self) -> Admission {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => Admission::Pass,
            CircuitState::HalfOpen => Admission::Rejected,
            CircuitState::Open => {
                let expired = inner
                    .opened_at
                    .is_some_and(|t| t.elapsed() >= self.config.reset_timeout);
                if expired && !inner.trial_in_flight {
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_in_flight = true;
                    drop(inner);
                    self.observer.on_state_change(
                        &self.name,
                        CircuitState::Open,
                        CircuitState::HalfOpen,
                    );
                    Admission::Trial
                } else {
                    Admission::Rejected
                }
            }
        }
    }

    fn record_success(&self, trial: bool) {
        let (previous_failures, transition) = {
            let mut inner = self.inner.lock().unwrap();
            let previous = inner.consecutive_failures;
            inner.consecutive_failures = 0;
            if trial {
                inner.trial_in_flight = false;
                let old = inner.state;
                inner.state = CircuitState::Closed;
                inner.opened_at = None;
                (previous, (old != CircuitState::Closed).then_some(old))
            } else {
                (previous, None)
            }
        };
        self.observer.on_success(&self.name, previous_failures);
        if let Some(old) = transition {
            self.observer
                .on_state_change(&self.name, old, CircuitState::Closed);
        }
    }

    fn record_failure(&self, trial: bool) {
        enum Recorded {
            Counted { count: u32, remaining: u32 },
            Tripped { count: u32, from: CircuitState },
            Reopened { from: CircuitState },
            Ignored,
        }

        let recorded = {
            let mut inner = self.inner.lock().unwrap();
            if trial {
                inner.trial_in_flight = false;
                let from = inner.state;
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                Recorded::Reopened { from }
            } else {
                match inner.state {
                    CircuitState::Closed => {
                        inner.consecutive_failures += 1;
                        let count = inner.consecutive_failures;
                        if count >= self.config.failure_threshold {
                            inner.state = CircuitState::Open;
                            inner.opened_at = Some(Instant::now());
                            Recorded::Tripped {
                                count,
                                from: CircuitState::Closed,
                            }
                        } else {
                            Recorded::Counted {
                                count,
                                remaining: self.config.failure_threshold - count,
                            }
                        }
                    }
                    // A call admitted while Closed can resolve after the
                    // circuit already tripped; it must not push the counter
                    // past the threshold semantics.
                    CircuitState::Open | CircuitState::HalfOpen => Recorded::Ignored,
                }
            }
        };

        match recorded {
            Recorded::Counted { count, remaining } => {
                self.observer.on_failure(&self.name, count, remaining);
            }
            Recorded::Tripped { count, from } => {
                self.observer.on_failure(&self.name, count, 0);
                self.observer
                    .on_state_change(&self.name, from, CircuitState::Open);
            }
            Recorded::Reopened { from } => {
                if from != CircuitState::Open {
                    self.observer
                        .on_state_change(&self.name, from, CircuitState::Open);
                }
            }
            Recorded::Ignored => {}
        }
    }

    /// Release an unresolved trial slot. The circuit returns to Open with
    /// its original `opened_at`, so the next caller may start a new trial.
    fn abandon_trial(&self) {
        let transition = {
            let mut inner = self.inner.lock().unwrap();
            if inner.trial_in_flight && inner.state == CircuitState::HalfOpen {
                inner.trial_in_flight = false;
                inner.state = CircuitState::Open;
                true
            } else {
                false
            }
        };
        if transition {
            self.observer
                .on_state_change(&self.name, CircuitState::HalfOpen, CircuitState::Open);
        }
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &inner.state)
            .field("consecutive_failures", &inner.consecutive_failures)
            .field("config", &self.config)
            .finish()
    }
}

struct TrialPermit<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialPermit<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.abandon_trial();
        }
    }
}
