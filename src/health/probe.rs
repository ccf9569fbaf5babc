//! On-demand health probe for the primary provider.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::provider::Provider;

/// Checks whether the primary provider is answering, with a short
/// deadline of its own. Side-effect free; breaker state is never touched.
pub struct HealthProbe {
    primary: Arc<dyn Provider>,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(primary: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self { primary, timeout }
    }

    /// One liveness call. Transport errors and deadline misses are `false`.
    pub async fn check_primary(&self) -> bool {
        match time::timeout(self.timeout, self.primary.check_liveness()).await {
            Ok(alive) => alive,
            Err(_) => {
                tracing::debug!(
                    provider = self.primary.name(),
                    timeout = ?self.timeout,
                    "Health probe timed out"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{DeliveryReceipt, Notification, ProviderError};
    use async_trait::async_trait;

    struct SlowProvider {
        delay: Duration,
        alive: bool,
    }

    #[async_trait]
    impl Provider for SlowProvider {
        fn name(&self) -> &str {
            "aldeamo"
        }

        async fn attempt(&self, _: &Notification) -> Result<DeliveryReceipt, ProviderError> {
            unreachable!("probe never attempts deliveries")
        }

        async fn check_liveness(&self) -> bool {
            time::sleep(self.delay).await;
            self.alive
        }
    }

    #[tokio::test]
    async fn reports_liveness() {
        let probe = HealthProbe::new(
            Arc::new(SlowProvider {
                delay: Duration::from_millis(0),
                alive: true,
            }),
            Duration::from_millis(100),
        );
        assert!(probe.check_primary().await);
    }

    #[tokio::test]
    async fn dead_provider_is_false() {
        let probe = HealthProbe::new(
            Arc::new(SlowProvider {
                delay: Duration::from_millis(0),
                alive: false,
            }),
            Duration::from_millis(100),
        );
        assert!(!probe.check_primary().await);
    }

    #[tokio::test]
    async fn slow_provider_is_false() {
        let probe = HealthProbe::new(
            Arc::new(SlowProvider {
                delay: Duration::from_secs(5),
                alive: true,
            }),
            Duration::from_millis(20),
        );
        assert!(!probe.check_primary().await);
    }
}
