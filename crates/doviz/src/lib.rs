//! doviz — fetch the canlidoviz.com market page and extract asset quotes.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod respond;
pub mod types;

pub use error::{ExtractionMiss, FetchError};
pub use extract::{extract, parse_document, Extraction};
pub use fetch::{FetchConfig, Fetcher, Page};
pub use respond::Assembled;
pub use types::*;
