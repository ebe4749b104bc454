//! Health Check System
//!
//! Runs every registered probe concurrently, each bounded by the same
//! deadline, and folds the outcomes into one [`Report`].

mod invocation;
mod probe;
mod report;
mod routes;

pub use invocation::*;
pub use probe::*;
pub use report::*;
pub use routes::*;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::config::{HealthConfig, ProbeSpec};
use crate::telemetry::ProbeMetrics;

/// Default deadline for a single probe invocation.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// ═══════════════════════════════════════════════════════════════════════════════
// Probe Set
// ═══════════════════════════════════════════════════════════════════════════════

/// Named probes, unique by name.
#[derive(Clone, Default)]
pub struct ProbeSet {
    probes: BTreeMap<String, Arc<dyn Probe>>,
}

impl ProbeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build probes from their configured definitions.
    pub fn from_specs(specs: &[ProbeSpec]) -> crate::Result<Self> {
        let mut set = Self::new();
        for spec in specs {
            set.register(spec.name.clone(), spec.build()?);
        }
        Ok(set)
    }

    /// Register a probe, replacing any earlier probe with the same name.
    pub fn register(&mut self, name: impl Into<String>, probe: Arc<dyn Probe>) {
        self.probes.insert(name.into(), probe);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_probe(mut self, name: impl Into<String>, probe: Arc<dyn Probe>) -> Self {
        self.register(name, probe);
        self
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.probes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Probe>)> {
        self.probes.iter().map(|(name, probe)| (name.as_str(), probe))
    }
}

impl std::fmt::Debug for ProbeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.probes.keys()).finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Report Production
// ═══════════════════════════════════════════════════════════════════════════════

/// Run every probe once and collect the report.
///
/// All invocations start before any is awaited; the call returns once every
/// one of them has resolved, so the latency is bounded by `deadline`.
pub async fn produce_report(probes: &ProbeSet, deadline: Duration) -> Report {
    let pending: Vec<_> = probes
        .iter()
        .map(|(name, probe)| {
            let observed_at = Utc::now();
            let invocation = invoke(name, Arc::clone(probe), deadline);
            let name = name.to_owned();
            async move {
                let outcome = invocation.await;
                ProbeResult::from_outcome(name, observed_at, outcome.into_result())
            }
        })
        .collect();

    let results = futures::future::join_all(pending).await;
    let report = Report::new(results);

    debug!(
        total = report.results.len(),
        unhealthy = report.unhealthy_count(),
        status = %report.status,
        "Health report produced"
    );
    ProbeMetrics::record_report(report.status.as_str());

    report
}

// ═══════════════════════════════════════════════════════════════════════════════
// Health Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Health service owning the probe set and the shared deadline.
#[derive(Debug, Clone)]
pub struct HealthService {
    probes: ProbeSet,
    check_timeout: Duration,
}

impl HealthService {
    pub fn new(probes: ProbeSet) -> Self {
        Self {
            probes,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    /// Build from configuration, constructing every configured probe.
    pub fn from_config(config: &HealthConfig, specs: &[ProbeSpec]) -> crate::Result<Self> {
        Ok(Self::new(ProbeSet::from_specs(specs)?).with_check_timeout(config.check_timeout))
    }

    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    pub fn check_timeout(&self) -> Duration {
        self.check_timeout
    }

    pub fn probes(&self) -> &ProbeSet {
        &self.probes
    }

    /// Run all probes concurrently with the configured deadline.
    pub async fn produce_report(&self) -> Report {
        produce_report(&self.probes, self.check_timeout).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
