//! Assembles the served snapshot from the outcome of each pipeline stage.
//!
//! Every stage hands back an explicit `Result`. This is the one place that
//! decides what a failure turns into: fetch and extraction failures
//! are logged and degrade to empty data; the fetch error itself is kept on
//! [`Assembled`] so the HTTP layer can still choose to surface it.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::extract::{self, Extraction};
use crate::fetch::Page;
use crate::types::{QuoteMap, Snapshot};

/// A snapshot plus the upstream failure it was degraded from, if any.
#[derive(Debug)]
pub struct Assembled {
    pub snapshot: Snapshot,
    pub upstream_error: Option<FetchError>,
}

impl Snapshot {
    /// Run the parse and extraction stages over a fetch outcome and build
    /// the snapshot. Never fails.
    pub fn assemble(fetched: Result<Page, FetchError>) -> Assembled {
        let (status, extraction, upstream_error) = match fetched {
            Ok(page) => (page.status_line(), extract_page(&page), None),
            Err(e) => {
                warn!("fetch failed: {e}");
                (String::new(), Extraction::empty(), Some(e))
            }
        };

        let prime_assets = match extraction.prime {
            Ok(quotes) => quotes,
            Err(miss) => {
                warn!("prime assets: {miss}");
                QuoteMap::new()
            }
        };

        debug!(
            prime = prime_assets.len(),
            others = extraction.others.len(),
            "snapshot assembled"
        );

        Assembled {
            snapshot: Snapshot {
                time: Utc::now(),
                status,
                prime_assets,
                others: extraction.others,
            },
            upstream_error,
        }
    }
}

fn extract_page(page: &Page) -> Extraction {
    let document = extract::parse_document(&page.body);
    extract::extract(&document)
}
