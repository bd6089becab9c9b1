//! Persisted sync state
//!
//! Two entries survive between runs: the epoch-ms timestamp of the last
//! successful sync (`lastSyncTimestamp`) and the JSON-serialized cached rule
//! array (`cachedRules`). The store is a trait so the sync policy can run
//! against an in-memory fake; the file-backed implementation keeps both
//! entries in one JSON object and replaces the file atomically, which is what
//! guarantees the two keys are never observed half-updated.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::model::Rule;
use super::RulesError;

/// Storage key for the epoch-ms timestamp of the last successful sync
pub const LAST_SYNC_KEY: &str = "lastSyncTimestamp";

/// Storage key for the JSON-serialized cached rule array
pub const CACHED_RULES_KEY: &str = "cachedRules";

/// Key-value persistence for sync state
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;

    #[allow(dead_code)]
    fn set(&mut self, key: &str, value: &str) -> Result<(), RulesError>;

    /// Write several entries as a single atomic update
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), RulesError>;
}

/// Store backed by a single JSON object file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`. A missing file is an empty store; an
    /// unparseable one is ignored with a warning rather than failing the run.
    pub fn open(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(_) => {
                    eprintln!(
                        "Warning: could not parse state file {}; starting fresh",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self { path, entries }
    }

    /// Serialize all entries and replace the state file in one rename
    fn persist(&self) -> Result<(), RulesError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| RulesError::Store(format!("no parent for {}", self.path.display())))?;
        fs::create_dir_all(parent)
            .map_err(|e| RulesError::Store(format!("create {}: {e}", parent.display())))?;

        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| RulesError::Store(format!("encode state: {e}")))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| RulesError::Store(format!("temp file in {}: {e}", parent.display())))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| RulesError::Store(format!("write {}: {e}", self.path.display())))?;
        tmp.persist(&self.path)
            .map_err(|e| RulesError::Store(format!("replace {}: {e}", self.path.display())))?;

        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RulesError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), RulesError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        self.persist()
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RulesError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), RulesError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}

/// Snapshot of the persisted sync state
#[derive(Debug, Default, PartialEq)]
pub struct SyncState {
    /// Last successful sync, epoch ms
    pub last_sync: Option<i64>,
    /// Rule set persisted by the last successful sync
    pub cached_rules: Option<Vec<Rule>>,
}

/// Read both entries. Unparseable values are treated as absent.
pub fn read_state(store: &impl StateStore) -> SyncState {
    let last_sync = store
        .get(LAST_SYNC_KEY)
        .and_then(|raw| raw.parse::<i64>().ok());
    let cached_rules = store
        .get(CACHED_RULES_KEY)
        .and_then(|raw| serde_json::from_str(&raw).ok());

    SyncState {
        last_sync,
        cached_rules,
    }
}

/// Persist a successful sync: both entries together, never one without the other
pub fn write_state(
    store: &mut impl StateStore,
    now_ms: i64,
    rules: &[Rule],
) -> Result<(), RulesError> {
    let timestamp = now_ms.to_string();
    let cached = serde_json::to_string(rules)
        .map_err(|e| RulesError::Store(format!("encode cached rules: {e}")))?;
    store.set_many(&[
        (LAST_SYNC_KEY, timestamp.as_str()),
        (CACHED_RULES_KEY, cached.as_str()),
    ])
}
