//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::BreakerConfig;

/// Root configuration for the notification gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Primary/secondary provider endpoints.
    pub providers: ProvidersConfig,

    /// Circuit breaker tuning for the primary provider.
    pub breaker: BreakerSettings,

    /// Health probe settings.
    pub probe: ProbeConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The two provider endpoints the gateway dispatches to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub primary: ProviderConfig,
    pub secondary: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: ProviderConfig {
                name: "aldeamo".to_string(),
                base_url: "http://aldeamo-service:8001".to_string(),
                ..ProviderConfig::default()
            },
            secondary: ProviderConfig {
                name: "twilio".to_string(),
                base_url: "http://twilio-service:8002".to_string(),
                ..ProviderConfig::default()
            },
        }
    }
}

/// One remote notification provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider label used in logs, metrics and status payloads.
    pub name: String,

    /// Base URL of the provider service.
    pub base_url: String,

    /// Path of the notify endpoint.
    pub notify_path: String,

    /// Path of the liveness endpoint.
    pub health_path: String,

    /// Per-attempt request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "provider".to_string(),
            base_url: "http://localhost:8001".to_string(),
            notify_path: "/notify".to_string(),
            health_path: "/health".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Circuit breaker tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerSettings {
    /// Consecutive failures before the circuit opens.
    pub failure_threshold: u32,

    /// Seconds the circuit stays open before a trial call is allowed.
    pub reset_timeout_secs: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            reset_timeout_secs: 15,
        }
    }
}

impl From<&BreakerSettings> for BreakerConfig {
    fn from(settings: &BreakerSettings) -> Self {
        Self {
            failure_threshold: settings.failure_threshold,
            reset_timeout: Duration::from_secs(settings.reset_timeout_secs),
        }
    }
}

/// Health probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Probe deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 2 }
    }
}

/// Admin API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin endpoints.
    pub enabled: bool,

    /// Bearer token required by the admin endpoints.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: "admin-secret-key".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Address the exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_tuning() {
        let config = GatewayConfig::default();
        assert_eq!(config.breaker.failure_threshold, 3);
        assert_eq!(config.breaker.reset_timeout_secs, 15);
        assert_eq!(config.providers.primary.notify_path, "/notify");
        assert_eq!(config.providers.secondary.name, "twilio");
        assert_eq!(config.probe.timeout_secs, 2);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [providers.primary]
            name = "aldeamo"
            base_url = "http://127.0.0.1:9001"

            [breaker]
            failure_threshold = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.providers.primary.base_url, "http://127.0.0.1:9001");
        assert_eq!(config.providers.primary.timeout_secs, 5);
        assert_eq!(config.breaker.failure_threshold, 5);
        assert_eq!(config.breaker.reset_timeout_secs, 15);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
