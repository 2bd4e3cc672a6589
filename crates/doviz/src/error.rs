//! Error types for fetching and extraction.

/// Failure of the outbound request to the upstream page.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("upstream request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The shared HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// An extraction pass could not find the structure it anchors on.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMiss {
    #[error("title not found")]
    TitleNotFound,

    #[error("table not found")]
    TableNotFound,
}
