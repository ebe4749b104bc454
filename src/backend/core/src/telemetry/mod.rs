//! Telemetry: structured logging and probe metrics.
//!
//! - **Logging**: JSON/pretty/compact output through `tracing-subscriber`
//! - **Metrics**: counters for probe outcomes and reports, recorded through the
//!   `metrics` facade. No exporter is installed here; without a recorder the
//!   calls are no-ops.

pub mod logging;
pub mod metrics;

pub use self::logging::{init_logging, LogFormat, LoggingConfig};
pub use self::metrics::{describe_metrics, ProbeMetrics};
