//! Rule storage, sync policy and application

use std::path::PathBuf;

use thiserror::Error;

pub mod apply;
pub mod fetch;
pub mod model;
pub mod store;
pub mod sync;

// Re-exports for library consumers
#[allow(unused_imports)]
pub use apply::{apply_rule, ApplyOutcome};
#[allow(unused_imports)]
pub use model::{Author, Rule};
#[allow(unused_imports)]
pub use sync::{RuleService, SyncOutcome};

/// Errors surfaced by the rules engine.
///
/// None of these abort the process: the sync policy recovers from `Fetch` by
/// falling back to local rules, and the commands report the rest as messages.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The bundled rule set is empty; there is nothing to show or apply
    #[error("no local rules available")]
    NoLocalRules,

    /// Network error, non-success status, or unreadable response body
    #[error("failed to fetch rules: {0}")]
    Fetch(String),

    /// A rule array (bundled, cached or fetched) did not parse
    #[error("failed to parse rules JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The apply target is not an existing directory
    #[error("workspace directory not found: {}", .0.display())]
    NoWorkspace(PathBuf),

    /// Writing the `.cursorrules` file failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Persisting the sync state failed
    #[error("failed to persist sync state: {0}")]
    Store(String),
}
