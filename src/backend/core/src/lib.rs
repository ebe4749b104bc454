//! # Healthgate Core
//!
//! Aggregates the health of named service dependencies into one HTTP report.
//!
//! ## Architecture
//!
//! - **Probes**: synchronous per-dependency checks (closures, TCP, filesystem)
//! - **Bounded invocation**: each probe runs on its own thread behind a panic
//!   boundary, raced against a shared deadline
//! - **Report**: concurrent fan-out/fan-in over every probe, aggregated into
//!   `ok` (HTTP 200) or `degraded` (HTTP 500)
//! - **Telemetry**: structured logging and probe counters

pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod telemetry;

pub use error::{HealthgateError, ProbeError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{HealthgateError, ProbeError, Result};
    pub use crate::health::{
        invoke, probe_fn, produce_report, AggregateStatus, HealthService, Outcome, PathProbe,
        Probe, ProbeResult, ProbeSet, ProbeState, Report, TcpProbe,
    };
}
