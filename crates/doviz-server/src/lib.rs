//! doviz server — serves scraped canlidoviz.com quotes as JSON.

pub mod config;
pub mod rest;

pub use config::{Overrides, ServerConfig, UpstreamPolicy};
pub use rest::{router, AppState};
