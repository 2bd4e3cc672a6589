//! doviz server — entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use doviz::Fetcher;
use doviz_server::config::{Overrides, ServerConfig};
use doviz_server::rest::{self, AppState};

#[derive(Parser)]
#[command(
    name = "doviz-server",
    about = "Serve canlidoviz.com market quotes as JSON",
    version
)]
struct Cli {
    /// Listen address (host:port). Also reads DOVIZ_LISTEN.
    #[arg(long)]
    listen: Option<String>,

    /// Page to scrape. Also reads DOVIZ_UPSTREAM_URL.
    #[arg(long)]
    upstream_url: Option<String>,

    /// User-Agent sent upstream. Also reads DOVIZ_USER_AGENT.
    #[arg(long)]
    user_agent: Option<String>,

    /// Upstream deadline in milliseconds. Also reads DOVIZ_TIMEOUT_MS.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Answer 502 instead of empty data when the upstream fetch fails.
    /// Also reads DOVIZ_STRICT_UPSTREAM.
    #[arg(long)]
    strict_upstream: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::resolve(Overrides {
        listen: cli.listen,
        upstream_url: cli.upstream_url,
        user_agent: cli.user_agent,
        timeout_ms: cli.timeout_ms,
        strict_upstream: cli.strict_upstream,
    })?;

    tracing::info!(
        upstream = %config.fetch.url,
        timeout_ms = config.fetch.timeout_ms,
        policy = ?config.policy,
        "starting doviz-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let fetcher = Fetcher::new(config.fetch).context("failed to initialize upstream client")?;
    let state = Arc::new(AppState {
        fetcher,
        policy: config.policy,
    });

    rest::start(config.listen, state).await
}
