//! Rule data model and the bundled rule set
//!
//! Rules are identified by `slug`, but uniqueness is not enforced: a rule
//! list may contain duplicates, which are tolerated and only reported by
//! [`duplicate_slugs`]. Lookup always returns the first match.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::RulesError;

/// Rule set shipped inside the binary, the offline fallback
const BUNDLED_RULES: &str = include_str!("../../assets/rules.json");

/// Authorship metadata attached to a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub url: Option<String>,
    pub avatar: Option<String>,
}

/// A named, tagged markdown content block - the unit of selection and application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub libs: Vec<String>,
    pub content: String,
    pub author: Author,
}

/// Parse a JSON array of rules
pub fn parse_rules(json: &str) -> Result<Vec<Rule>, RulesError> {
    Ok(serde_json::from_str(json)?)
}

/// Load the rule set bundled with the binary
pub fn bundled_rules() -> Result<Vec<Rule>, RulesError> {
    parse_rules(BUNDLED_RULES)
}

/// Find a rule by slug. Duplicates are possible; the first match wins.
pub fn find_by_slug<'a>(rules: &'a [Rule], slug: &str) -> Option<&'a Rule> {
    rules.iter().find(|r| r.slug == slug)
}

/// Slugs appearing more than once, in first-seen order
pub fn duplicate_slugs(rules: &[Rule]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rule in rules {
        *counts.entry(rule.slug.as_str()).or_default() += 1;
    }

    let mut seen = BTreeSet::new();
    rules
        .iter()
        .filter(|r| counts[r.slug.as_str()] > 1 && seen.insert(r.slug.as_str()))
        .map(|r| r.slug.clone())
        .collect()
}
