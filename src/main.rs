mod access;
mod client;
mod convert;
mod error;
mod models;
mod season;
mod teams;
mod tools;

use std::time::Duration;

use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use crate::client::{Endpoints, LIVE_BASE_URL, NbaClient, STATIC_BASE_URL, STATS_BASE_URL};
use crate::tools::NbaServer;

#[derive(Parser)]
#[command(version, about = "MCP server for NBA scores, players, teams and league stats")]
struct Cli {
    #[arg(long, env = "NBA_STATS_BASE_URL", default_value = STATS_BASE_URL)]
    stats_base_url: String,
    #[arg(long, env = "NBA_LIVE_BASE_URL", default_value = LIVE_BASE_URL)]
    live_base_url: String,
    #[arg(long, env = "NBA_STATIC_BASE_URL", default_value = STATIC_BASE_URL)]
    static_base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, env = "NBA_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

fn validate_base_url(flag: &str, raw: &str) -> Result<String, String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("{flag}: invalid URL: {e}"))?;

    match parsed.scheme() {
        "http" | "https" => {}
        s => {
            return Err(format!(
                "{flag}: unsupported scheme '{s}', expected http or https"
            ));
        }
    }

    if parsed.query().is_some() {
        return Err(format!("{flag} must not contain a query string"));
    }
    if parsed.fragment().is_some() {
        return Err(format!("{flag} must not contain a fragment"));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(format!("{flag} must not contain credentials"));
    }

    let s = parsed.as_str().trim_end_matches('/');
    Ok(s.to_owned())
}

fn endpoints(cli: &Cli) -> Result<Endpoints, String> {
    Ok(Endpoints {
        stats: validate_base_url("stats-base-url", &cli.stats_base_url)?,
        live: validate_base_url("live-base-url", &cli.live_base_url)?,
        static_data: validate_base_url("static-base-url", &cli.static_base_url)?,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let endpoints = match endpoints(&cli) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(stats = %endpoints.stats, live = %endpoints.live, static_data = %endpoints.static_data, "endpoints");
    tracing::info!(timeout_secs = cli.timeout_secs, "request timeout");

    let client = NbaClient::new(endpoints, Duration::from_secs(cli.timeout_secs))?;
    let service = NbaServer::new(client)
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to start MCP service"))?;

    tracing::info!("NBA MCP server running on stdio");
    service.waiting().await?;
    Ok(())
}
