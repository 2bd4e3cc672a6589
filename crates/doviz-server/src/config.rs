//! Configuration loading and resolution.
//!
//! Each setting resolves from the explicit CLI value, then its `DOVIZ_*`
//! environment variable, then the built-in default.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use doviz::fetch::{FetchConfig, DEFAULT_TIMEOUT_MS, DEFAULT_UPSTREAM_URL, DEFAULT_USER_AGENT};

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

pub const ENV_LISTEN: &str = "DOVIZ_LISTEN";
pub const ENV_UPSTREAM_URL: &str = "DOVIZ_UPSTREAM_URL";
pub const ENV_USER_AGENT: &str = "DOVIZ_USER_AGENT";
pub const ENV_TIMEOUT_MS: &str = "DOVIZ_TIMEOUT_MS";
pub const ENV_STRICT_UPSTREAM: &str = "DOVIZ_STRICT_UPSTREAM";

/// What the HTTP layer does when the upstream fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamPolicy {
    /// Answer 200 with empty maps.
    #[default]
    Degrade,
    /// Answer 502 with the empty snapshot as body.
    Surface,
}

/// Fully resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub fetch: FetchConfig,
    pub policy: UpstreamPolicy,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<String>,
    pub upstream_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_ms: Option<u64>,
    pub strict_upstream: bool,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with(
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let listen = pick(overrides.listen, env(ENV_LISTEN), DEFAULT_LISTEN);
        let listen: SocketAddr = listen
            .parse()
            .with_context(|| format!("invalid listen address '{listen}'"))?;

        let timeout_ms = match overrides.timeout_ms {
            Some(ms) => ms,
            None => match env(ENV_TIMEOUT_MS) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid {ENV_TIMEOUT_MS} '{raw}'"))?,
                None => DEFAULT_TIMEOUT_MS,
            },
        };
        anyhow::ensure!(timeout_ms > 0, "timeout must be greater than zero");

        let strict = overrides.strict_upstream
            || env(ENV_STRICT_UPSTREAM).is_some_and(|v| is_truthy(&v));

        Ok(Self {
            listen,
            fetch: FetchConfig {
                url: pick(
                    overrides.upstream_url,
                    env(ENV_UPSTREAM_URL),
                    DEFAULT_UPSTREAM_URL,
                ),
                user_agent: pick(
                    overrides.user_agent,
                    env(ENV_USER_AGENT),
                    DEFAULT_USER_AGENT,
                ),
                timeout_ms,
            },
            policy: if strict {
                UpstreamPolicy::Surface
            } else {
                UpstreamPolicy::Degrade
            },
        })
    }
}

fn pick(explicit: Option<String>, env_value: Option<String>, default: &str) -> String {
    explicit
        .or(env_value.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| default.to_string())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
