//! Shared utilities for commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::config;
use crate::rules::fetch::HttpFetcher;
use crate::rules::model;
use crate::rules::store::FileStore;
use crate::rules::sync::RuleService;

/// Current wall-clock time as epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format an epoch-milliseconds timestamp for display
pub fn format_epoch_ms(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Build the production rule service: bundled rules, HTTP fetcher against the
/// configured source URL, file-backed state store
pub fn open_service() -> Result<RuleService<HttpFetcher, FileStore>> {
    let local = model::bundled_rules().context("Failed to load bundled rules")?;
    let url = config::rules_url()?;
    let fetcher = HttpFetcher::new(&url, config::HTTP_TIMEOUT)
        .with_context(|| format!("Failed to build HTTP client for {}", url))?;
    let store = FileStore::open(config::state_file()?);

    Ok(RuleService::new(local, fetcher, store))
}
