//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher call to the primary provider:
//!     → circuit_breaker.rs (admit, reject, or admit as the recovery trial)
//!     → provider attempt runs with the breaker lock released
//!     → outcome committed back to the breaker
//!     → observer.rs notified of failures, successes and state changes
//! ```
//!
//! # Design Decisions
//! - One breaker per guarded provider; the fallback provider is unguarded
//! - Fail fast in Open; the wrapped call is never attempted
//! - Timeout expiry is checked lazily on the call path, no timer task
//! - Exactly one trial call in HalfOpen

pub mod circuit_breaker;
pub mod observer;

pub use circuit_breaker::{BreakerConfig, BreakerSnapshot, CircuitBreaker, CircuitState, GuardError};
pub use observer::{BreakerObserver, TracingObserver};
