//! Outbound fetch of the upstream market page.
//!
//! A single GET under a hard deadline. No retries, no backoff: a slow or
//! broken upstream costs one deadline and the caller degrades to empty data.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::FetchError;

/// Page scraped by default.
pub const DEFAULT_UPSTREAM_URL: &str = "https://canlidoviz.com/";

/// Browser identity sent upstream; the site rejects default client agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/108.0.0.0 Safari/537.36 OPR/94.0.0.0";

/// Per-request deadline for the whole upstream exchange.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Settings for the shared fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Raw upstream response, passed through whatever its status.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Page {
    /// Status rendered as `"<code> <reason>"`, e.g. `"200 OK"`.
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }
}

/// Fetches the upstream page. Cheap to clone; the underlying client and
/// its connection pool are shared.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl Fetcher {
    /// Build the process-wide client. Nothing is mutated after this.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url: config.url,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET the upstream page, body included, within the deadline.
    ///
    /// When the deadline elapses first the in-flight request is dropped
    /// and [`FetchError::Timeout`] is returned.
    pub async fn fetch(&self) -> Result<Page, FetchError> {
        let after_ms = self.timeout.as_millis() as u64;
        match tokio::time::timeout(self.timeout, self.get()).await {
            Ok(Err(e)) if e.is_timeout() => Err(FetchError::Timeout { after_ms }),
            Ok(result) => result.map_err(FetchError::Transport),
            Err(_) => Err(FetchError::Timeout { after_ms }),
        }
    }

    async fn get(&self) -> Result<Page, reqwest::Error> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        tracing::debug!(url = %self.url, %status, bytes = body.len(), "fetched upstream page");
        Ok(Page { status, body })
    }
}
