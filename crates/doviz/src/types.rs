//! Core data types for scraped quotes and the served snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One asset's code/name with its display-formatted price and change.
///
/// Price and change are kept exactly as the upstream page renders them,
/// locale symbols included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub name: String,
    pub price: String,
    pub change: String,
}

impl Quote {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        change: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            change: change.into(),
        }
    }

    /// True when name, price and change are all empty.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.price.is_empty() && self.change.is_empty()
    }
}

/// Quotes keyed by their extracted name. Later inserts overwrite earlier ones.
pub type QuoteMap = BTreeMap<String, Quote>;

/// The record served to clients for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Assembly time, not fetch time.
    #[serde(rename = "Time")]
    pub time: DateTime<Utc>,
    /// Upstream status line such as `"200 OK"`; empty when the fetch failed.
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "PrimeAssets")]
    pub prime_assets: QuoteMap,
    #[serde(rename = "Others")]
    pub others: QuoteMap,
}

impl Snapshot {
    /// An empty snapshot stamped with the current time.
    pub fn empty() -> Self {
        Self {
            time: Utc::now(),
            status: String::new(),
            prime_assets: QuoteMap::new(),
            others: QuoteMap::new(),
        }
    }

    /// Serialize to the JSON response body.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
