//! Writing a rule into a workspace's .cursorrules file
//!
//! Cursor reads project instructions from a single `.cursorrules` file at
//! the workspace root. Applying a rule replaces that file wholesale, so an
//! existing file is only overwritten after the caller confirms.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::Rule;
use super::RulesError;

/// File name Cursor looks for at the workspace root
pub const CURSOR_RULES_FILE: &str = ".cursorrules";

/// Result of an apply attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Rule content written to this path
    Written(PathBuf),
    /// An existing file was kept because the caller declined the overwrite
    Declined,
}

/// Where a rule lands inside a workspace directory
///
/// # Example
/// ```
/// use cursor_rules::rules::apply::target_path;
///
/// let path = target_path("/home/me/projects/app");
/// assert_eq!(path.to_string_lossy(), "/home/me/projects/app/.cursorrules");
/// ```
pub fn target_path<P: AsRef<Path>>(workspace: P) -> PathBuf {
    workspace.as_ref().join(CURSOR_RULES_FILE)
}

/// Write `rule`'s content to the workspace's `.cursorrules` file.
///
/// `confirm_overwrite` is consulted only when the file already exists; a
/// missing file is written without asking. Declining leaves the existing
/// file untouched.
pub fn apply_rule<P, F>(
    rule: &Rule,
    workspace: P,
    confirm_overwrite: F,
) -> Result<ApplyOutcome, RulesError>
where
    P: AsRef<Path>,
    F: FnOnce() -> bool,
{
    let workspace = workspace.as_ref();
    if !workspace.is_dir() {
        return Err(RulesError::NoWorkspace(workspace.to_path_buf()));
    }

    let target = target_path(workspace);

    if target.exists() && !confirm_overwrite() {
        return Ok(ApplyOutcome::Declined);
    }

    fs::write(&target, &rule.content).map_err(|source| RulesError::Write {
        path: target.clone(),
        source,
    })?;

    Ok(ApplyOutcome::Written(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::model::Author;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn rule(content: &str) -> Rule {
        Rule {
            title: "Test Rule".to_string(),
            slug: "test-rule".to_string(),
            tags: BTreeSet::new(),
            libs: vec![],
            content: content.to_string(),
            author: Author {
                name: "Test Author".to_string(),
                url: None,
                avatar: None,
            },
        }
    }

    #[test]
    fn test_target_path_joins_file_name() {
        let path = target_path("/tmp/project");
        assert!(path.ends_with(".cursorrules"));
        assert_eq!(path.parent().unwrap(), Path::new("/tmp/project"));
    }

    #[test]
    fn test_apply_writes_new_file_without_confirmation() {
        let dir = tempdir().unwrap();
        let outcome = apply_rule(&rule("# My rule\n"), dir.path(), || {
            panic!("must not prompt when no file exists")
        })
        .unwrap();

        assert_eq!(outcome, ApplyOutcome::Written(target_path(dir.path())));
        let written = fs::read_to_string(target_path(dir.path())).unwrap();
        assert_eq!(written, "# My rule\n");
    }

    #[test]
    fn test_apply_overwrites_after_confirmation() {
        let dir = tempdir().unwrap();
        fs::write(target_path(dir.path()), "old content").unwrap();

        let outcome = apply_rule(&rule("new content"), dir.path(), || true).unwrap();

        assert!(matches!(outcome, ApplyOutcome::Written(_)));
        let written = fs::read_to_string(target_path(dir.path())).unwrap();
        assert_eq!(written, "new content");
    }

    #[test]
    fn test_declined_overwrite_keeps_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(target_path(dir.path()), "old content").unwrap();

        let outcome = apply_rule(&rule("new content"), dir.path(), || false).unwrap();

        assert_eq!(outcome, ApplyOutcome::Declined);
        let kept = fs::read_to_string(target_path(dir.path())).unwrap();
        assert_eq!(kept, "old content");
    }

    #[test]
    fn test_missing_workspace_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = apply_rule(&rule("content"), &missing, || true).unwrap_err();
        assert!(matches!(err, RulesError::NoWorkspace(p) if p == missing));
    }
}
