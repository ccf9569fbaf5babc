//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! AdminControl
//!     → probe.rs (one on-demand liveness call against the primary)
//!     → bool (errors and timeouts collapse to false)
//! ```
//!
//! # Design Decisions
//! - On-demand only; no background polling loop
//! - Purely informational: never touches breaker state
//! - Used to gate forced resets (probe-then-force)

pub mod probe;

pub use probe::HealthProbe;
