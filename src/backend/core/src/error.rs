//! Error types for Healthgate.
//!
//! Two families live here:
//! - [`HealthgateError`]: failures of the service itself (configuration,
//!   probe construction, binding the listener).
//! - [`ProbeError`]: the failure a probe reports through its normal contract.
//!   It never escapes a report; it becomes an `unhealthy` entry.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for Healthgate operations.
pub type Result<T> = std::result::Result<T, HealthgateError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Service Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors raised while configuring or running the service.
#[derive(Debug, Error)]
pub enum HealthgateError {
    /// Configuration could not be loaded or deserialized
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration was loaded but is not usable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A probe definition could not be turned into a probe
    #[error("invalid probe '{name}': {reason}")]
    InvalidProbe { name: String, reason: String },

    /// I/O failure (binding, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HealthgateError {
    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Create an invalid probe error.
    pub fn invalid_probe(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProbe {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Probe Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// A descriptive failure returned by a probe's `check`.
///
/// Only the message survives into the report, so conversions flatten the
/// source error into its display text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProbeError {
    message: String,
}

impl ProbeError {
    /// Create a probe error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message recorded in the report.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the error, returning its message.
    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<String> for ProbeError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProbeError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<anyhow::Error> for ProbeError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(err.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_error_display_is_message() {
        let err = ProbeError::new("db down");
        assert_eq!(err.to_string(), "db down");
        assert_eq!(err.message(), "db down");
    }

    #[test]
    fn test_probe_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ProbeError = io.into();
        assert_eq!(err.message(), "refused");
    }

    #[test]
    fn test_probe_error_from_anyhow_keeps_top_context() {
        let err: ProbeError = anyhow::anyhow!("inner")
            .context("cache unreachable")
            .into();
        assert_eq!(err.into_message(), "cache unreachable");
    }

    #[test]
    fn test_probe_error_question_mark() {
        fn check() -> std::result::Result<(), ProbeError> {
            Err("queue full")?
        }
        assert_eq!(check().unwrap_err().message(), "queue full");
    }

    #[test]
    fn test_invalid_probe_display() {
        let err = HealthgateError::invalid_probe("db", "empty address");
        assert_eq!(err.to_string(), "invalid probe 'db': empty address");
    }
}
