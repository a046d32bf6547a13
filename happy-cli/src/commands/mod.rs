//! Command implementations for the happy CLI

pub mod create;
pub mod submit;

pub use create::run_create;
pub use submit::run_submit;

use anyhow::{Context, Result};
use happy_core::{HappyConfig, HttpOrphanageApi};
use tracing::debug;

/// Build the API client from config, with an optional `--api-url` override
pub(crate) fn build_api(config: &HappyConfig, api_url: Option<&str>) -> Result<HttpOrphanageApi> {
    let base_url = api_url.unwrap_or(&config.api.base_url);
    debug!(base_url, "using API");

    let api = match config.api.timeout() {
        Some(timeout) => HttpOrphanageApi::with_timeout(base_url, timeout),
        None => HttpOrphanageApi::new(base_url),
    };
    api.context("Failed to create API client")
}
