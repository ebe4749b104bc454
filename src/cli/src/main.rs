//! Healthgate CLI - query a Healthgate server's health report.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::check;
use output::OutputFormat;

/// Healthgate - dependency health report client
#[derive(Parser)]
#[command(
    name = "healthgate",
    version,
    about = "Healthgate - dependency health report client",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Server URL
    #[arg(
        long,
        global = true,
        env = "HEALTHGATE_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the health report; exits with status 1 when degraded
    Check(check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let client = client::ApiClient::new(&cli.api_url)?;
    let format = cli.output;

    let result = match cli.command {
        Commands::Check(args) => check::execute(args, &client, format).await,
    };

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}
