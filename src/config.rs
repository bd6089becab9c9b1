//! Platform-specific configuration and paths

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default remote source for the curated rule list
pub const DEFAULT_RULES_URL: &str =
    "https://raw.githubusercontent.com/beilunyang/cursor-rules/main/src/rules.json";

/// Environment variable overriding the remote rules URL
pub const RULES_URL_ENV: &str = "CURSOR_RULES_URL";

/// Fixed client-side timeout for the reachability probe and the rule fetch
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Age of the last successful sync after which a new one is attempted (24h).
/// A sync exactly this old is still considered fresh.
pub const SYNC_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Resolve the remote rules URL: `CURSOR_RULES_URL` if set, else the default
pub fn rules_url() -> Result<String> {
    validate_rules_url(std::env::var(RULES_URL_ENV).ok())
}

/// Validate an optional override against the default
fn validate_rules_url(override_url: Option<String>) -> Result<String> {
    match override_url {
        Some(raw) => {
            let url =
                Url::parse(&raw).with_context(|| format!("Invalid {}: {}", RULES_URL_ENV, raw))?;
            Ok(url.into())
        }
        None => Ok(DEFAULT_RULES_URL.to_string()),
    }
}

/// Get the cursor-rules state directory
/// - macOS: ~/Library/Application Support/cursor-rules/
/// - Linux: ~/.config/cursor-rules/
/// - Windows: %APPDATA%/cursor-rules/
pub fn state_dir() -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join("Library")
            .join("Application Support")
            .join("cursor-rules"))
    }

    #[cfg(target_os = "linux")]
    {
        let config = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config.join("cursor-rules"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = dirs::config_dir().context("Could not determine AppData directory")?;
        Ok(appdata.join("cursor-rules"))
    }
}

/// Path of the persisted sync state file
pub fn state_file() -> Result<PathBuf> {
    Ok(state_dir()?.join("state.json"))
}
