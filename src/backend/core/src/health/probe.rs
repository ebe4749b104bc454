//! Probes: the per-dependency health check capability.
//!
//! A probe answers one synchronous question: is this dependency healthy?
//! This module provides:
//! - The [`Probe`] trait, implemented for any `Fn() -> Result<(), ProbeError>`
//! - **TCP**: a dependency is healthy when a connection can be opened
//! - **Path**: a file or directory exists (and optionally is writable)
//!
//! # Example
//!
//! ```rust,ignore
//! use healthgate_core::health::{probe_fn, ProbeSet, TcpProbe};
//!
//! let probes = ProbeSet::new()
//!     .with_probe("postgres", Arc::new(TcpProbe::new("localhost:5432")))
//!     .with_probe("always", probe_fn(|| Ok(())));
//! ```

use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ProbeError;

/// Default connect timeout for [`TcpProbe`].
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

// ═══════════════════════════════════════════════════════════════════════════════
// Probe Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Health check for a single service dependency.
///
/// `check` may be called from several report requests at once, each on its own
/// thread. Within a single report every probe is invoked at most once.
pub trait Probe: Send + Sync {
    /// Return `Ok(())` when healthy, or a descriptive failure.
    fn check(&self) -> Result<(), ProbeError>;
}

impl<F> Probe for F
where
    F: Fn() -> Result<(), ProbeError> + Send + Sync,
{
    fn check(&self) -> Result<(), ProbeError> {
        self()
    }
}

/// Wrap a closure as a shared probe.
///
/// Passing the closure through this function lets its return type be inferred.
pub fn probe_fn<F>(f: F) -> Arc<dyn Probe>
where
    F: Fn() -> Result<(), ProbeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TCP Probe
// ═══════════════════════════════════════════════════════════════════════════════

/// Healthy when a TCP connection to `address` can be opened.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    connect_timeout: Duration,
}

impl TcpProbe {
    /// Create a probe for `host:port` with the default connect timeout.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set the per-address connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Probe for TcpProbe {
    fn check(&self) -> Result<(), ProbeError> {
        let addrs = self
            .address
            .to_socket_addrs()
            .map_err(|e| ProbeError::new(format!("resolve {}: {}", self.address, e)))?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(_) => return Ok(()),
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) => ProbeError::new(format!("connect {}: {}", self.address, e)),
            None => ProbeError::new(format!("{} resolved to no addresses", self.address)),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Path Probe
// ═══════════════════════════════════════════════════════════════════════════════

/// Healthy when `path` exists, and when required, is not read-only.
#[derive(Debug, Clone)]
pub struct PathProbe {
    path: PathBuf,
    writable: bool,
}

impl PathProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writable: false,
        }
    }

    /// Also require the path to be writable.
    pub fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Probe for PathProbe {
    fn check(&self) -> Result<(), ProbeError> {
        let metadata = std::fs::metadata(&self.path)
            .map_err(|e| ProbeError::new(format!("{}: {}", self.path.display(), e)))?;

        if self.writable && metadata.permissions().readonly() {
            return Err(ProbeError::new(format!(
                "{}: read-only",
                self.path.display()
            )));
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
