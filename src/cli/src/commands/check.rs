//! Health check command.
//!
//! Queries the report endpoint and displays per-probe state.

use anyhow::Result;
use clap::Args;
use colored::*;
use tabled::Tabled;

use crate::client::{ApiClient, HealthResponse, ProbeEntry};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct CheckArgs {
    /// Route serving the report
    #[arg(long, default_value = "/health")]
    path: String,
}

/// Table row for one probe.
#[derive(Debug, Tabled)]
struct ProbeRow {
    #[tabled(rename = "Probe")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Checked At")]
    time: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&ProbeEntry> for ProbeRow {
    fn from(entry: &ProbeEntry) -> Self {
        Self {
            name: entry.name.clone(),
            state: entry.state.clone(),
            time: entry.time.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
            error: entry.error.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Rows sorted by name; the server's order is not meaningful.
fn rows(response: &HealthResponse) -> Vec<ProbeRow> {
    let mut rows: Vec<ProbeRow> = response.entries.iter().map(ProbeRow::from).collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

/// Returns whether the report was healthy.
pub async fn execute(args: CheckArgs, client: &ApiClient, format: OutputFormat) -> Result<bool> {
    let response = client.get_report(&args.path).await?;

    match format {
        OutputFormat::Table => {
            output::print_header("Dependency Health");
            output::print_detail("Server", client.base_url());
            output::print_detail("HTTP Status", response.status.as_str());
            println!();

            if response.entries.is_empty() {
                println!("{}", "No probes registered.".dimmed());
            } else {
                println!("{}", output::render_table(&rows(&response)));
            }

            if response.is_ok() {
                output::print_success("All dependencies healthy");
            } else {
                let unhealthy = response
                    .entries
                    .iter()
                    .filter(|e| e.error.is_some())
                    .count();
                output::print_error(&format!(
                    "{} of {} dependencies unhealthy",
                    unhealthy,
                    response.entries.len()
                ));
            }
        }
        _ => output::print_serialized(&response.entries, format)?,
    }

    Ok(response.is_ok())
}
