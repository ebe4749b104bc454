//! Bounded invocation of a single probe.
//!
//! Every invocation runs the probe on its own named OS thread whose root is a
//! `catch_unwind` boundary, and races the result against a fixed deadline:
//!
//! - The probe returns: its result is the outcome.
//! - The deadline fires first: the outcome is [`Outcome::TimedOut`]. The thread
//!   is abandoned, never killed; whatever it produces later is sent into a
//!   channel nobody listens on.
//! - The probe panics with a `&str`/`String` payload: [`Outcome::Panicked`].
//! - The probe panics with any other payload: the panic is resumed so it ends
//!   that thread, and the invocation resolves to [`Outcome::Aborted`] as soon as
//!   the channel closes.
//!
//! Each path resolves the invocation exactly once.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use super::probe::Probe;
use crate::telemetry::ProbeMetrics;

/// Message recorded for a probe whose thread ended without reporting.
pub const ABORTED_MESSAGE: &str = "probe terminated abnormally";

type PanicPayload = Box<dyn Any + Send + 'static>;

/// How one invocation resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The probe reported healthy
    Success,
    /// The probe returned a failure through its contract
    Failed(String),
    /// The deadline elapsed before the probe returned
    TimedOut(Duration),
    /// The probe panicked with a renderable message
    Panicked(String),
    /// The probe's thread ended without producing a result
    Aborted,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure message recorded in the report, if any.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success => None,
            Self::Failed(message) | Self::Panicked(message) => Some(message.clone()),
            Self::TimedOut(deadline) => Some(format!("deadline exceeded after {:?}", deadline)),
            Self::Aborted => Some(ABORTED_MESSAGE.to_string()),
        }
    }

    /// Collapse into the success/failure shape stored in a report.
    pub fn into_result(self) -> Result<(), String> {
        match self.error_message() {
            None => Ok(()),
            Some(message) => Err(message),
        }
    }
}

/// Start one invocation of `probe`, bounded by `deadline`.
///
/// The probe starts running before this function returns; the returned
/// future only waits for it.
pub fn invoke(
    name: &str,
    probe: Arc<dyn Probe>,
    deadline: Duration,
) -> impl Future<Output = Outcome> + Send + 'static {
    let name = name.to_owned();
    let started = spawn_probe(&name, probe);

    async move {
        let outcome = match started {
            Ok(receiver) => match tokio::time::timeout(deadline, receiver).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_closed)) => Outcome::Aborted,
                Err(_elapsed) => Outcome::TimedOut(deadline),
            },
            Err(e) => Outcome::Failed(format!("failed to start probe thread: {}", e)),
        };

        record(&name, &outcome);
        outcome
    }
}

fn spawn_probe(name: &str, probe: Arc<dyn Probe>) -> std::io::Result<oneshot::Receiver<Outcome>> {
    let (sender, receiver) = oneshot::channel();
    let span = tracing::debug_span!("probe", probe = %name);

    thread::Builder::new()
        .name(format!("probe-{}", name.replace('\0', "")))
        .spawn(move || {
            let _entered = span.enter();
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| probe.check())) {
                Ok(Ok(())) => Outcome::Success,
                Ok(Err(err)) => Outcome::Failed(err.into_message()),
                Err(payload) => match panic_message(payload) {
                    Ok(message) => Outcome::Panicked(message),
                    Err(payload) => panic::resume_unwind(payload),
                },
            };
            // The receiver is gone once the deadline has fired.
            let _ = sender.send(outcome);
        })?;

    Ok(receiver)
}

/// Render a panic payload, handing it back when it carries no message.
fn panic_message(payload: PanicPayload) -> Result<String, PanicPayload> {
    match payload.downcast::<&'static str>() {
        Ok(message) => Ok((*message).to_string()),
        Err(payload) => payload.downcast::<String>().map(|message| *message),
    }
}

fn record(name: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Success => {
            debug!(probe = %name, "Probe healthy");
        }
        Outcome::Failed(message) => {
            warn!(probe = %name, error = %message, "Probe failed");
        }
        Outcome::TimedOut(deadline) => {
            warn!(probe = %name, deadline = ?deadline, "Probe timed out");
            ProbeMetrics::record_timeout(name);
        }
        Outcome::Panicked(message) => {
            warn!(probe = %name, error = %message, "Probe panicked");
            ProbeMetrics::record_fault(name, true);
        }
        Outcome::Aborted => {
            error!(probe = %name, "Probe thread died with a non-string panic payload");
            ProbeMetrics::record_fault(name, false);
        }
    }

    let state = if outcome.is_success() { "healthy" } else { "unhealthy" };
    ProbeMetrics::record_check(name, state);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
