//! Failover dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! send(notification)
//!     → breaker.guard(primary.attempt)
//!     → success: done, active provider = primary
//!     → BreakerOpen (not counted) or provider failure (already counted)
//!         → secondary.attempt, unguarded
//!         → success: done, active provider = secondary
//!         → failure: AllProvidersFailed
//! ```
//!
//! # Design Decisions
//! - The secondary is the fallback of last resort and carries no breaker
//! - One send attempts each provider at most once; retries are the
//!   caller's decision, never hidden here

pub mod dispatcher;

pub use dispatcher::{ActiveProvider, AllProvidersFailed, Dispatch, FailoverDispatcher};
