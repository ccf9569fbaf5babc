//! Notification Gateway Library
//!
//! Routes outbound notifications to a primary provider behind a circuit
//! breaker and fails over to a secondary provider when the primary is
//! rejected or failing.

pub mod admin;
pub mod config;
pub mod dispatch;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod provider;
pub mod resilience;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::{build_gateway, Shutdown};
