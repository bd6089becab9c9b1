//! Rule loading and the sync decision policy
//!
//! The policy, in order: make sure the bundled set is usable, probe the
//! remote source, then decide between the cached set, a fresh fetch, and the
//! bundled fallback. Persisted state moves forward only on a successful
//! fetch, and always both entries at once.

use super::fetch::RuleFetcher;
use super::model::{self, Rule};
use super::store::{self, StateStore};
use super::RulesError;
use crate::config::SYNC_INTERVAL_MS;

/// What a load produced and how it got there
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Rules the caller should present
    pub rules: Vec<Rule>,
    /// True while the rule set still awaits a successful sync
    pub needs_sync: bool,
    /// True when the most recent reachability probe or fetch failed
    pub is_offline: bool,
    /// Last successful sync, epoch ms
    pub last_sync: Option<i64>,
}

/// Whether a sync is due at `now_ms`. Absent means never synced; a sync
/// exactly 24h old is still fresh. The subtraction saturates so an extreme
/// timestamp from a tampered state file reads as stale instead of wrapping.
pub fn needs_sync(last_sync: Option<i64>, now_ms: i64) -> bool {
    match last_sync {
        None => true,
        Some(ts) => now_ms.saturating_sub(ts) > SYNC_INTERVAL_MS,
    }
}

/// Sync policy engine over the bundled rules, an injected fetcher and an
/// injected state store
pub struct RuleService<F, S> {
    local: Vec<Rule>,
    fetcher: F,
    store: S,
}

impl<F: RuleFetcher, S: StateStore> RuleService<F, S> {
    pub fn new(local: Vec<Rule>, fetcher: F, store: S) -> Self {
        Self {
            local,
            fetcher,
            store,
        }
    }

    /// The persisted-state store, for inspection
    #[allow(dead_code)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load rules under the sync policy.
    ///
    /// Offline or failed fetches fall back to the bundled set without
    /// touching persisted state; only a successful fetch moves the cache and
    /// timestamp forward.
    pub fn load(&mut self, now_ms: i64) -> Result<SyncOutcome, RulesError> {
        let outcome = self.load_inner(now_ms, false)?;
        warn_duplicates(&outcome.rules);
        Ok(outcome)
    }

    /// Forced variant behind the `sync` command and the `syncRules` request:
    /// the freshness check is skipped, everything else is identical.
    pub fn sync(&mut self, now_ms: i64) -> Result<SyncOutcome, RulesError> {
        let outcome = self.load_inner(now_ms, true)?;
        warn_duplicates(&outcome.rules);
        Ok(outcome)
    }

    fn load_inner(&mut self, now_ms: i64, force: bool) -> Result<SyncOutcome, RulesError> {
        if self.local.is_empty() {
            return Err(RulesError::NoLocalRules);
        }

        let state = store::read_state(&self.store);

        if !self.fetcher.probe() {
            return Ok(SyncOutcome {
                rules: self.local.clone(),
                needs_sync: true,
                is_offline: true,
                last_sync: state.last_sync,
            });
        }

        let due = force || needs_sync(state.last_sync, now_ms);

        if !due {
            if let Some(cached) = state.cached_rules {
                return Ok(SyncOutcome {
                    rules: cached,
                    needs_sync: false,
                    is_offline: false,
                    last_sync: state.last_sync,
                });
            }

            // Fresh timestamp but no cache: nothing to refresh, nothing
            // cached to serve. Fall back to the bundled set.
            return Ok(SyncOutcome {
                rules: self.local.clone(),
                needs_sync: false,
                is_offline: false,
                last_sync: state.last_sync,
            });
        }

        match self.fetcher.fetch() {
            Ok(fetched) => {
                store::write_state(&mut self.store, now_ms, &fetched)?;
                Ok(SyncOutcome {
                    rules: fetched,
                    needs_sync: false,
                    is_offline: false,
                    last_sync: Some(now_ms),
                })
            }
            Err(e) => {
                eprintln!("Warning: rule sync failed: {e}");
                Ok(SyncOutcome {
                    rules: self.local.clone(),
                    needs_sync: true,
                    is_offline: true,
                    last_sync: state.last_sync,
                })
            }
        }
    }
}

/// Report duplicate slugs; they are tolerated, never deduplicated
fn warn_duplicates(rules: &[Rule]) {
    for slug in model::duplicate_slugs(rules) {
        eprintln!("Warning: duplicate rule slug '{slug}'");
    }
}
