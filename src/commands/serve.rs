//! Serve command - Speak the editor protocol over stdio
//!
//! One JSON message per line in both directions. Requests that produce no
//! response (setRule) print nothing; malformed lines are reported on stderr
//! and skipped so one bad message never kills the session.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::utils;
use crate::protocol::{OverwritePolicy, Request, Session};
use crate::rules::fetch::RuleFetcher;
use crate::rules::store::StateStore;

/// Execute the serve command
pub fn execute(workspace: Option<PathBuf>, force: bool) -> Result<()> {
    let workspace = match workspace {
        Some(d) => d,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let service = utils::open_service()?;
    let overwrite = if force {
        OverwritePolicy::Force
    } else {
        OverwritePolicy::Keep
    };
    let mut session = Session::new(service, workspace, overwrite);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;

        if let Some(response) = handle_line(&mut session, &line, utils::now_ms()) {
            stdout
                .write_all(response.as_bytes())
                .context("Failed to write response")?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Process one protocol line; Some(json) when a response should be written
fn handle_line<F: RuleFetcher, S: StateStore>(
    session: &mut Session<F, S>,
    line: &str,
    now_ms: i64,
) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Warning: ignoring malformed request: {e}");
            return None;
        }
    };

    match session.handle(request, now_ms) {
        Ok(Some(response)) => match serde_json::to_string(&response) {
            Ok(json) => Some(json),
            Err(e) => {
                eprintln!("Warning: failed to encode response: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            eprintln!("Warning: request failed: {e}");
            None
        }
    }
}
