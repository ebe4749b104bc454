//! Report types produced by a health run.
//!
//! This module provides:
//! - `ProbeState` for the state of a single dependency
//! - `ProbeResult` for the record of one probe in one report
//! - `AggregateStatus` and `Report` for the combined outcome
//!
//! # Wire Format
//!
//! Each `ProbeResult` serializes as
//! `{"name": .., "state": "healthy"|"unhealthy", "time": <RFC 3339>, "error": ..}`
//! where `error` is omitted for healthy entries. The aggregate maps to HTTP
//! `200` (ok) or `500` (degraded).

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// Probe State
// ═══════════════════════════════════════════════════════════════════════════════

/// State of a single service dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeState {
    /// The probe's check succeeded
    Healthy,
    /// The probe failed, timed out or faulted
    Unhealthy,
}

impl ProbeState {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for ProbeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Probe Result
// ═══════════════════════════════════════════════════════════════════════════════

/// The outcome of one probe within one report.
///
/// `error` is present exactly when `state` is [`ProbeState::Unhealthy`]; the
/// two constructors are the only way this crate builds a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Probe name, unique within a report
    pub name: String,

    /// Health state
    pub state: ProbeState,

    /// When the invocation for this probe began
    #[serde(rename = "time")]
    pub observed_at: DateTime<Utc>,

    /// Failure message (only present if unhealthy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    /// Create a healthy result.
    pub fn healthy(name: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            state: ProbeState::Healthy,
            observed_at,
            error: None,
        }
    }

    /// Create an unhealthy result carrying the failure message.
    pub fn unhealthy(
        name: impl Into<String>,
        observed_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            state: ProbeState::Unhealthy,
            observed_at,
            error: Some(error.into()),
        }
    }

    /// Build from an invocation outcome.
    pub fn from_outcome(
        name: impl Into<String>,
        observed_at: DateTime<Utc>,
        outcome: Result<(), String>,
    ) -> Self {
        match outcome {
            Ok(()) => Self::healthy(name, observed_at),
            Err(message) => Self::unhealthy(name, observed_at, message),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state.is_healthy()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Aggregate Status
// ═══════════════════════════════════════════════════════════════════════════════

/// Overall classification of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateStatus {
    /// Every probe is healthy (vacuously true for an empty probe set)
    #[default]
    Ok,
    /// At least one probe is unhealthy
    Degraded,
}

impl AggregateStatus {
    /// Derive the aggregate from a set of results.
    pub fn from_results(results: &[ProbeResult]) -> Self {
        if results.iter().all(ProbeResult::is_healthy) {
            Self::Ok
        } else {
            Self::Degraded
        }
    }

    /// HTTP status code for this aggregate.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Ok => StatusCode::OK,
            Self::Degraded => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Degraded => "degraded",
        }
    }
}

impl std::fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Report
// ═══════════════════════════════════════════════════════════════════════════════

/// Aggregated outcome of running every probe once.
///
/// The order of `results` follows completion of the fan-in and carries no
/// meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// One entry per probe
    pub results: Vec<ProbeResult>,

    /// Overall status
    pub status: AggregateStatus,
}

impl Report {
    /// Assemble a report, deriving the aggregate status from the results.
    pub fn new(results: Vec<ProbeResult>) -> Self {
        let status = AggregateStatus::from_results(&results);
        Self { results, status }
    }

    pub fn status(&self) -> AggregateStatus {
        self.status
    }

    /// HTTP status code for this report.
    pub fn http_status(&self) -> StatusCode {
        self.status.http_status()
    }

    pub fn is_ok(&self) -> bool {
        self.status == AggregateStatus::Ok
    }

    /// Get a specific result by probe name.
    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Number of unhealthy entries.
    pub fn unhealthy_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_healthy()).count()
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_healthy_result_has_no_error() {
        let result = ProbeResult::healthy("db", at());
        assert_eq!(result.state, ProbeState::Healthy);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_unhealthy_result_carries_error() {
        let result = ProbeResult::unhealthy("db", at(), "db down");
        assert_eq!(result.state, ProbeState::Unhealthy);
        assert_eq!(result.error.as_deref(), Some("db down"));
    }

    #[test]
    fn test_from_outcome() {
        assert!(ProbeResult::from_outcome("a", at(), Ok(())).is_healthy());

        let failed = ProbeResult::from_outcome("b", at(), Err("boom".into()));
        assert_eq!(failed.state, ProbeState::Unhealthy);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_empty_report_is_ok() {
        let report = Report::new(Vec::new());
        assert_eq!(report.status, AggregateStatus::Ok);
        assert_eq!(report.http_status(), StatusCode::OK);
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_all_healthy_is_ok() {
        let report = Report::new(vec![
            ProbeResult::healthy("a", at()),
            ProbeResult::healthy("b", at()),
        ]);
        assert!(report.is_ok());
        assert_eq!(report.unhealthy_count(), 0);
    }

    #[test]
    fn test_one_unhealthy_is_degraded() {
        let report = Report::new(vec![
            ProbeResult::healthy("a", at()),
            ProbeResult::unhealthy("b", at(), "db down"),
        ]);
        assert_eq!(report.status, AggregateStatus::Degraded);
        assert_eq!(report.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(report.unhealthy_count(), 1);
        assert!(report.get("b").is_some());
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_healthy_wire_format_omits_error() {
        let json = serde_json::to_value(ProbeResult::healthy("cache", at())).unwrap();
        assert_eq!(json["name"], "cache");
        assert_eq!(json["state"], "healthy");
        assert_eq!(json["time"], "2024-05-01T12:00:00Z");
        assert!(json.get("error").is_none());
        assert!(json.get("observed_at").is_none());
    }

    #[test]
    fn test_unhealthy_wire_format_has_error() {
        let json =
            serde_json::to_value(ProbeResult::unhealthy("cache", at(), "refused")).unwrap();
        assert_eq!(json["state"], "unhealthy");
        assert_eq!(json["error"], "refused");
    }

    #[test]
    fn test_wire_format_parses_back() {
        let raw = r#"[{"name":"a","state":"healthy","time":"2024-05-01T12:00:00Z"},
                      {"name":"b","state":"unhealthy","time":"2024-05-01T12:00:00Z","error":"x"}]"#;
        let results: Vec<ProbeResult> = serde_json::from_str(raw).unwrap();
        assert_eq!(results[0], ProbeResult::healthy("a", at()));
        assert_eq!(results[1], ProbeResult::unhealthy("b", at(), "x"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProbeState::Healthy.to_string(), "healthy");
        assert_eq!(ProbeState::Unhealthy.to_string(), "unhealthy");
        assert_eq!(AggregateStatus::Ok.to_string(), "ok");
        assert_eq!(AggregateStatus::Degraded.to_string(), "degraded");
    }
}
