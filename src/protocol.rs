//! Message protocol between an embedding editor surface and the rule engine
//!
//! Requests arrive as JSON objects tagged by a `command` field and responses
//! go back the same way. The `serve` command speaks this protocol over
//! stdio, one message per line.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::rules::apply::{self, ApplyOutcome};
use crate::rules::fetch::RuleFetcher;
use crate::rules::model::Rule;
use crate::rules::store::StateStore;
use crate::rules::sync::RuleService;
use crate::rules::RulesError;

/// Inbound message from the editor surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    /// Ask for the current rule set under the sync policy
    GetRules,
    /// Force a sync regardless of freshness
    SyncRules,
    /// Apply a rule to the session workspace
    #[serde(rename_all = "camelCase")]
    SetRule { rule: Rule },
}

/// Outbound message to the editor surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Response {
    /// Rule set plus the flags the UI renders
    #[serde(rename_all = "camelCase")]
    SetRules {
        rules: Vec<Rule>,
        last_sync: Option<i64>,
        needs_sync: bool,
        is_offline: bool,
    },
    /// A forced sync finished
    #[serde(rename_all = "camelCase")]
    SyncComplete { last_sync: Option<i64> },
}

/// What to do when `setRule` targets a workspace that already has a
/// `.cursorrules` file. The protocol has no prompt channel, so the policy is
/// fixed per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Keep the existing file and report the skip
    Keep,
    /// Replace the existing file
    Force,
}

/// One protocol session bound to a rule service and a workspace directory
pub struct Session<F, S> {
    service: RuleService<F, S>,
    workspace: PathBuf,
    overwrite: OverwritePolicy,
}

impl<F: RuleFetcher, S: StateStore> Session<F, S> {
    pub fn new(service: RuleService<F, S>, workspace: PathBuf, overwrite: OverwritePolicy) -> Self {
        Self {
            service,
            workspace,
            overwrite,
        }
    }

    #[allow(dead_code)]
    pub fn service(&self) -> &RuleService<F, S> {
        &self.service
    }

    /// Dispatch one request. `setRule` produces no response message, only a
    /// side effect on the workspace.
    pub fn handle(&mut self, request: Request, now_ms: i64) -> Result<Option<Response>, RulesError> {
        match request {
            Request::GetRules => {
                // An empty bundled set is fatal for the load, not for the
                // session: report it and hand the UI an empty list.
                let outcome = match self.service.load(now_ms) {
                    Ok(outcome) => outcome,
                    Err(e @ RulesError::NoLocalRules) => {
                        eprintln!("Warning: {e}");
                        return Ok(Some(Response::SetRules {
                            rules: vec![],
                            last_sync: None,
                            needs_sync: true,
                            is_offline: false,
                        }));
                    }
                    Err(e) => return Err(e),
                };

                Ok(Some(Response::SetRules {
                    rules: outcome.rules,
                    last_sync: outcome.last_sync,
                    needs_sync: outcome.needs_sync,
                    is_offline: outcome.is_offline,
                }))
            }
            Request::SyncRules => {
                let outcome = self.service.sync(now_ms)?;
                Ok(Some(Response::SyncComplete {
                    last_sync: outcome.last_sync,
                }))
            }
            Request::SetRule { rule } => {
                let force = self.overwrite == OverwritePolicy::Force;
                match apply::apply_rule(&rule, &self.workspace, || force)? {
                    ApplyOutcome::Written(_) => {}
                    ApplyOutcome::Declined => {
                        eprintln!(
                            "Warning: {} exists, skipping '{}' (run with --force to overwrite)",
                            apply::target_path(&self.workspace).display(),
                            rule.slug
                        );
                    }
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::model::Author;
    use crate::rules::store::{self, MemoryStore};
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::tempdir;

    const NOW: i64 = 1_700_000_000_000;

    fn rule(slug: &str) -> Rule {
        Rule {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            tags: BTreeSet::new(),
            libs: vec![],
            content: format!("# {slug}\n"),
            author: Author {
                name: "Test Author".to_string(),
                url: None,
                avatar: None,
            },
        }
    }

    struct OnlineFetcher(Vec<Rule>);

    impl RuleFetcher for OnlineFetcher {
        fn probe(&self) -> bool {
            true
        }

        fn fetch(&self) -> Result<Vec<Rule>, RulesError> {
            Ok(self.0.clone())
        }
    }

    fn session(workspace: PathBuf, overwrite: OverwritePolicy) -> Session<OnlineFetcher, MemoryStore> {
        let service = RuleService::new(
            vec![rule("local")],
            OnlineFetcher(vec![rule("remote")]),
            MemoryStore::new(),
        );
        Session::new(service, workspace, overwrite)
    }

    #[test]
    fn test_request_wire_format() {
        let request: Request = serde_json::from_str(r#"{"command":"getRules"}"#).unwrap();
        assert_eq!(request, Request::GetRules);

        let request: Request = serde_json::from_str(r#"{"command":"syncRules"}"#).unwrap();
        assert_eq!(request, Request::SyncRules);

        let json = serde_json::json!({
            "command": "setRule",
            "rule": {
                "title": "A",
                "slug": "a",
                "content": "# a\n",
                "author": {"name": "Test Author"}
            }
        });
        let request: Request = serde_json::from_value(json).unwrap();
        assert!(matches!(request, Request::SetRule { rule } if rule.slug == "a"));
    }

    #[test]
    fn test_response_wire_format_uses_camel_case() {
        let response = Response::SetRules {
            rules: vec![],
            last_sync: Some(42),
            needs_sync: false,
            is_offline: true,
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["command"], "setRules");
        assert_eq!(json["lastSync"], 42);
        assert_eq!(json["needsSync"], false);
        assert_eq!(json["isOffline"], true);

        let json = serde_json::to_value(Response::SyncComplete { last_sync: None }).unwrap();
        assert_eq!(json["command"], "syncComplete");
        assert!(json["lastSync"].is_null());
    }

    #[test]
    fn test_get_rules_returns_set_rules() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path().to_path_buf(), OverwritePolicy::Keep);

        let response = session.handle(Request::GetRules, NOW).unwrap().unwrap();
        match response {
            Response::SetRules {
                rules,
                last_sync,
                needs_sync,
                is_offline,
            } => {
                assert_eq!(rules, vec![rule("remote")]);
                assert_eq!(last_sync, Some(NOW));
                assert!(!needs_sync);
                assert!(!is_offline);
            }
            other => panic!("unexpected response: {other:?}"),
        }

        // The fetched set is now the persisted cache
        let state = store::read_state(session.service().store());
        assert_eq!(state.last_sync, Some(NOW));
        assert_eq!(state.cached_rules, Some(vec![rule("remote")]));
    }

    #[test]
    fn test_get_rules_with_empty_bundle_returns_empty_list() {
        let dir = tempdir().unwrap();
        let service = RuleService::new(vec![], OnlineFetcher(vec![]), MemoryStore::new());
        let mut session = Session::new(service, dir.path().to_path_buf(), OverwritePolicy::Keep);

        let response = session.handle(Request::GetRules, NOW).unwrap().unwrap();
        match response {
            Response::SetRules {
                rules, needs_sync, ..
            } => {
                assert!(rules.is_empty());
                assert!(needs_sync);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_sync_rules_returns_sync_complete() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path().to_path_buf(), OverwritePolicy::Keep);

        let response = session.handle(Request::SyncRules, NOW).unwrap().unwrap();
        assert_eq!(response, Response::SyncComplete { last_sync: Some(NOW) });
    }

    #[test]
    fn test_set_rule_writes_and_stays_silent() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path().to_path_buf(), OverwritePolicy::Keep);

        let response = session
            .handle(Request::SetRule { rule: rule("a") }, NOW)
            .unwrap();

        assert!(response.is_none());
        let written = fs::read_to_string(dir.path().join(".cursorrules")).unwrap();
        assert_eq!(written, "# a\n");
    }

    #[test]
    fn test_set_rule_respects_keep_policy() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".cursorrules"), "existing").unwrap();
        let mut session = session(dir.path().to_path_buf(), OverwritePolicy::Keep);

        session
            .handle(Request::SetRule { rule: rule("a") }, NOW)
            .unwrap();

        let kept = fs::read_to_string(dir.path().join(".cursorrules")).unwrap();
        assert_eq!(kept, "existing");
    }

    #[test]
    fn test_set_rule_force_policy_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".cursorrules"), "existing").unwrap();
        let mut session = session(dir.path().to_path_buf(), OverwritePolicy::Force);

        session
            .handle(Request::SetRule { rule: rule("a") }, NOW)
            .unwrap();

        let written = fs::read_to_string(dir.path().join(".cursorrules")).unwrap();
        assert_eq!(written, "# a\n");
    }
}
