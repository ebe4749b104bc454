//! Configuration management.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{HealthgateError, Result};
use crate::health::{PathProbe, Probe, TcpProbe, DEFAULT_CHECK_TIMEOUT, DEFAULT_CONNECT_TIMEOUT};
use crate::telemetry::LoggingConfig;

/// Environment variable prefix, e.g. `HEALTHGATE__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "HEALTHGATE";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Health report configuration
    #[serde(default)]
    pub health: HealthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Probe definitions
    #[serde(default)]
    pub probes: Vec<ProbeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Route serving the report
    #[serde(default = "default_health_path")]
    pub path: String,

    /// Deadline applied to every probe invocation
    #[serde(default = "default_check_timeout", with = "humantime_serde")]
    pub check_timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: default_health_path(),
            check_timeout: default_check_timeout(),
        }
    }
}

/// A named probe definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSpec {
    /// Name reported in the health report
    pub name: String,

    #[serde(flatten)]
    pub kind: ProbeKind,
}

/// Probe kinds that can be declared in configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeKind {
    /// Open a TCP connection to `address`
    Tcp {
        address: String,
        #[serde(default = "default_connect_timeout", with = "humantime_serde")]
        connect_timeout: Duration,
    },
    /// Require `path` to exist (and be writable when asked)
    Path {
        path: PathBuf,
        #[serde(default)]
        writable: bool,
    },
}

impl ProbeSpec {
    /// Construct the probe this definition describes.
    pub fn build(&self) -> Result<Arc<dyn Probe>> {
        match &self.kind {
            ProbeKind::Tcp {
                address,
                connect_timeout,
            } => {
                if address.trim().is_empty() {
                    return Err(HealthgateError::invalid_probe(&self.name, "empty address"));
                }
                if connect_timeout.is_zero() {
                    return Err(HealthgateError::invalid_probe(
                        &self.name,
                        "connect_timeout must be greater than zero",
                    ));
                }
                Ok(Arc::new(
                    TcpProbe::new(address.clone()).with_connect_timeout(*connect_timeout),
                ))
            }
            ProbeKind::Path { path, writable } => {
                if path.as_os_str().is_empty() {
                    return Err(HealthgateError::invalid_probe(&self.name, "empty path"));
                }
                let probe = PathProbe::new(path.clone());
                Ok(Arc::new(if *writable { probe.writable() } else { probe }))
            }
        }
    }
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_health_path() -> String { "/health".to_string() }
fn default_check_timeout() -> Duration { DEFAULT_CHECK_TIMEOUT }
fn default_connect_timeout() -> Duration { DEFAULT_CONNECT_TIMEOUT }

impl Config {
    /// Load configuration from the environment only.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that would produce an unusable service.
    pub fn validate(&self) -> Result<()> {
        if !self.health.path.starts_with('/') {
            return Err(HealthgateError::invalid_config(format!(
                "health.path must start with '/': {}",
                self.health.path
            )));
        }
        if self.health.check_timeout.is_zero() {
            return Err(HealthgateError::invalid_config(
                "health.check_timeout must be greater than zero",
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.probes {
            if spec.name.trim().is_empty() {
                return Err(HealthgateError::invalid_config("probe name must not be empty"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(HealthgateError::invalid_config(format!(
                    "duplicate probe name: {}",
                    spec.name
                )));
            }
        }

        Ok(())
    }
}
