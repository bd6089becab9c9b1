//! Apply command - Write a rule into a workspace

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::utils;
use crate::rules::apply::{self, ApplyOutcome};
use crate::rules::model;
use crate::rules::RulesError;

/// Execute the apply command
pub fn execute(slug: &str, dir: Option<PathBuf>, yes: bool, dry_run: bool) -> Result<()> {
    let workspace = match dir {
        Some(d) => d,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let mut service = utils::open_service()?;
    let outcome = service.load(utils::now_ms())?;

    if outcome.is_offline {
        eprintln!("Warning: rule source unreachable, using local rules");
    }

    let rule = model::find_by_slug(&outcome.rules, slug)
        .with_context(|| format!("No rule found with slug '{}'", slug))?;

    if dry_run {
        println!("{}", dry_run_preview(&workspace)?);
        return Ok(());
    }

    let target = apply::target_path(&workspace);
    let existed = target.exists();

    let applied = apply::apply_rule(rule, &workspace, || {
        if yes {
            return true;
        }

        print!("{} already exists. Overwrite? (y/N) ", target.display());
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }

        input.trim().eq_ignore_ascii_case("y")
    })?;

    match applied {
        ApplyOutcome::Written(path) => {
            if existed {
                println!("{} {}", "Updated:".green(), path.display());
            } else {
                println!("{} {}", "Created:".green(), path.display());
            }
        }
        ApplyOutcome::Declined => {
            println!("Aborted.");
        }
    }

    Ok(())
}

/// Preview line for `--dry-run`, failing where a real run would fail
fn dry_run_preview(workspace: &Path) -> Result<String, RulesError> {
    if !workspace.is_dir() {
        return Err(RulesError::NoWorkspace(workspace.to_path_buf()));
    }

    let target = apply::target_path(workspace);
    if target.exists() {
        Ok(format!("Would overwrite {}", target.display()))
    } else {
        Ok(format!("Would create {}", target.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dry_run_preview_missing_workspace_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = dry_run_preview(&missing).unwrap_err();
        assert!(matches!(err, RulesError::NoWorkspace(p) if p == missing));
    }

    #[test]
    fn test_dry_run_preview_reports_create_then_overwrite() {
        let dir = tempdir().unwrap();

        let preview = dry_run_preview(dir.path()).unwrap();
        assert!(preview.starts_with("Would create"));

        std::fs::write(apply::target_path(dir.path()), "existing\n").unwrap();
        let preview = dry_run_preview(dir.path()).unwrap();
        assert!(preview.starts_with("Would overwrite"));
    }
}
