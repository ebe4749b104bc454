//! Probe and report counters.
//!
//! ```rust,ignore
//! use healthgate_core::telemetry::metrics::ProbeMetrics;
//!
//! ProbeMetrics::record_check("postgres", "unhealthy");
//! ProbeMetrics::record_timeout("postgres");
//! ```

use metrics::{counter, describe_counter};

pub const PROBE_CHECKS_TOTAL: &str = "healthgate_probe_checks_total";
pub const PROBE_TIMEOUTS_TOTAL: &str = "healthgate_probe_timeouts_total";
pub const PROBE_FAULTS_TOTAL: &str = "healthgate_probe_faults_total";
pub const REPORTS_TOTAL: &str = "healthgate_reports_total";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(PROBE_CHECKS_TOTAL, "Probe invocations by probe and resulting state");
    describe_counter!(PROBE_TIMEOUTS_TOTAL, "Probe invocations abandoned at the deadline");
    describe_counter!(PROBE_FAULTS_TOTAL, "Probe invocations that panicked");
    describe_counter!(REPORTS_TOTAL, "Health reports produced by aggregate status");
}

/// Recording helpers for probe invocations.
pub struct ProbeMetrics;

impl ProbeMetrics {
    pub fn record_check(probe: &str, state: &'static str) {
        counter!(
            PROBE_CHECKS_TOTAL,
            "probe" => probe.to_string(),
            "state" => state
        )
        .increment(1);
    }

    pub fn record_timeout(probe: &str) {
        counter!(PROBE_TIMEOUTS_TOTAL, "probe" => probe.to_string()).increment(1);
    }

    /// `recovered` is false when the panic payload could not be rendered.
    pub fn record_fault(probe: &str, recovered: bool) {
        counter!(
            PROBE_FAULTS_TOTAL,
            "probe" => probe.to_string(),
            "recovered" => if recovered { "true" } else { "false" }
        )
        .increment(1);
    }

    pub fn record_report(status: &'static str) {
        counter!(REPORTS_TOTAL, "status" => status).increment(1);
    }
}
