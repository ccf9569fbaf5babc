//! Observability subsystem.
//!
//! # Responsibilities
//! - Prometheus metrics exporter and metric helpers
//! - Structured logging is initialized in main via tracing-subscriber;
//!   everything else logs through the tracing macros

pub mod metrics;
