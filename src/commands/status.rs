//! Status command - Inspect sync state without syncing

use anyhow::Result;
use std::path::PathBuf;

use super::utils;
use crate::config;
use crate::rules::fetch::{HttpFetcher, RuleFetcher};
use crate::rules::model;
use crate::rules::store::{self, FileStore};
use crate::rules::sync;

/// Snapshot of where the rule cache stands
#[derive(Debug)]
pub struct Status {
    /// Configured rule source
    pub rules_url: String,

    /// Where sync state is persisted
    pub state_file: PathBuf,

    /// Rules shipped with the binary
    pub bundled_count: usize,

    /// Rules in the persisted cache (None when never synced)
    pub cached_count: Option<usize>,

    /// Last successful sync, epoch ms
    pub last_sync: Option<i64>,

    /// Whether the next load would attempt a fetch
    pub needs_sync: bool,

    /// Probe result (None when the probe was skipped)
    pub reachable: Option<bool>,
}

/// Gather the current status. Probing is opt-in so `status` stays a purely
/// local operation by default.
pub fn status(probe: bool) -> Result<Status> {
    let rules_url = config::rules_url()?;
    let state_file = config::state_file()?;

    let store = FileStore::open(state_file.clone());
    let state = store::read_state(&store);

    let bundled_count = model::bundled_rules()?.len();

    let reachable = if probe {
        let fetcher = HttpFetcher::new(&rules_url, config::HTTP_TIMEOUT)?;
        Some(fetcher.probe())
    } else {
        None
    };

    Ok(Status {
        rules_url,
        state_file,
        bundled_count,
        cached_count: state.cached_rules.map(|r| r.len()),
        last_sync: state.last_sync,
        needs_sync: sync::needs_sync(state.last_sync, utils::now_ms()),
        reachable,
    })
}

/// Format status for display
pub fn format_status(status: &Status) -> String {
    let mut lines = vec![];

    lines.push(format!("Rules URL: {}", status.rules_url));
    lines.push(format!("State File: {}", status.state_file.display()));

    lines.push(String::new()); // blank line

    lines.push(format!("Bundled Rules: {}", status.bundled_count));

    match status.cached_count {
        Some(n) => lines.push(format!("Cached Rules: {}", n)),
        None => lines.push("Cached Rules: (none)".to_string()),
    }

    match status.last_sync {
        Some(ts) => lines.push(format!("Last Sync: {}", utils::format_epoch_ms(ts))),
        None => lines.push("Last Sync: (never)".to_string()),
    }

    lines.push(format!(
        "Needs Sync: {}",
        if status.needs_sync { "yes" } else { "no" }
    ));

    if let Some(reachable) = status.reachable {
        lines.push(format!(
            "Reachable: {}",
            if reachable { "yes" } else { "no" }
        ));
    }

    lines.join("\n")
}
