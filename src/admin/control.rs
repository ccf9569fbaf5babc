//! Admin control operations layered on the breaker and the probe.

use std::sync::Arc;

use serde::Serialize;

use crate::dispatch::{ActiveProvider, FailoverDispatcher};
use crate::health::HealthProbe;
use crate::resilience::{CircuitBreaker, CircuitState};

/// Composed health view for external reporting.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub state: CircuitState,
    pub description: &'static str,
    pub failures: u32,
    pub threshold: u32,
    pub reset_timeout_secs: u64,
    pub active_provider: ActiveProvider,
}

/// Result of a forced reset request.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutcome {
    pub ok: bool,
    pub message: &'static str,
}

/// Operator-facing overrides and snapshots.
///
/// All state mutation goes through [`CircuitBreaker::force_close`]; this
/// layer only decides whether it is safe to call it.
pub struct AdminControl {
    breaker: Arc<CircuitBreaker>,
    probe: HealthProbe,
    dispatcher: Arc<FailoverDispatcher>,
}

impl AdminControl {
    pub fn new(
        breaker: Arc<CircuitBreaker>,
        probe: HealthProbe,
        dispatcher: Arc<FailoverDispatcher>,
    ) -> Self {
        Self {
            breaker,
            probe,
            dispatcher,
        }
    }

    /// Read-only reconnaissance: probe the primary and report the result.
    /// No effect on breaker state.
    pub async fn force_recovery_attempt(&self) -> bool {
        let recovered = self.probe.check_primary().await;
        tracing::info!(recovered, "Forced recovery probe against the primary");
        recovered
    }

    /// Probe-then-force reset.
    ///
    /// Only closes the breaker when the primary answers a live health
    /// check; otherwise it is a no-op that reports failure. This ordering
    /// stops an operator from reopening the circuit to a provider that is
    /// still broken.
    pub async fn force_reset(&self) -> ResetOutcome {
        if !self.probe.check_primary().await {
            tracing::warn!("Forced reset refused: the primary is still failing its health check");
            return ResetOutcome {
                ok: false,
                message: "primary is still failing; fix it before resetting the breaker",
            };
        }

        self.breaker.force_close();
        self.dispatcher
            .set_active_provider(ActiveProvider::Primary)
            .await;
        tracing::info!("Circuit breaker forced closed; primary restored as active provider");
        ResetOutcome {
            ok: true,
            message: "circuit breaker reset; primary restored as active provider",
        }
    }

    /// Pure read: breaker snapshot composed with the active provider.
    pub async fn status_snapshot(&self) -> HealthReport {
        let snapshot = self.breaker.snapshot();
        HealthReport {
            state: snapshot.state,
            description: snapshot.state.description(),
            failures: snapshot.consecutive_failures,
            threshold: snapshot.failure_threshold,
            reset_timeout_secs: snapshot.reset_timeout.as_secs(),
            active_provider: self.dispatcher.active_provider().await,
        }
    }
}
