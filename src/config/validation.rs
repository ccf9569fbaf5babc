//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds and timeouts > 0)
//! - Check addresses and provider URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{GatewayConfig, ProviderConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidMetricsAddress(String),
    InvalidProviderUrl { provider: String, url: String },
    ZeroProviderTimeout(String),
    ZeroFailureThreshold,
    ZeroResetTimeout,
    ZeroProbeTimeout,
    EmptyAdminApiKey,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address '{}' is not a socket address", addr)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address '{}' is not a socket address", addr)
            }
            ValidationError::InvalidProviderUrl { provider, url } => {
                write!(f, "provider '{}' has an unparseable base_url '{}'", provider, url)
            }
            ValidationError::ZeroProviderTimeout(provider) => {
                write!(f, "provider '{}' has a zero timeout", provider)
            }
            ValidationError::ZeroFailureThreshold => {
                write!(f, "breaker.failure_threshold must be positive")
            }
            ValidationError::ZeroResetTimeout => {
                write!(f, "breaker.reset_timeout_secs must be positive")
            }
            ValidationError::ZeroProbeTimeout => {
                write!(f, "probe.timeout_secs must be positive")
            }
            ValidationError::EmptyAdminApiKey => {
                write!(f, "admin.api_key must not be empty when the admin API is enabled")
            }
        }
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    validate_provider(&config.providers.primary, &mut errors);
    validate_provider(&config.providers.secondary, &mut errors);

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if config.breaker.reset_timeout_secs == 0 {
        errors.push(ValidationError::ZeroResetTimeout);
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::EmptyAdminApiKey);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_provider(provider: &ProviderConfig, errors: &mut Vec<ValidationError>) {
    if Url::parse(&provider.base_url).is_err() {
        errors.push(ValidationError::InvalidProviderUrl {
            provider: provider.name.clone(),
            url: provider.base_url.clone(),
        });
    }
    if provider.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProviderTimeout(provider.name.clone()));
    }
}
