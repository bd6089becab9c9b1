//! Show command - Print a single rule

use anyhow::{Context, Result};

use super::utils;
use crate::rules::model::{self, Rule};

/// Execute the show command
pub fn execute(slug: &str, raw: bool) -> Result<()> {
    let mut service = utils::open_service()?;
    let outcome = service.load(utils::now_ms())?;

    if outcome.is_offline {
        eprintln!("Warning: rule source unreachable, using local rules");
    }

    let rule = model::find_by_slug(&outcome.rules, slug)
        .with_context(|| format!("No rule found with slug '{}'", slug))?;

    if raw {
        // Exact content so the output can be piped into a file
        print!("{}", rule.content);
        return Ok(());
    }

    println!("{}", format_rule(rule));
    Ok(())
}

/// Format a rule for display
pub fn format_rule(rule: &Rule) -> String {
    let mut lines = vec![];

    lines.push(format!("Title: {}", rule.title));
    lines.push(format!("Slug: {}", rule.slug));

    match &rule.author.url {
        Some(url) => lines.push(format!("Author: {} ({})", rule.author.name, url)),
        None => lines.push(format!("Author: {}", rule.author.name)),
    }

    if !rule.tags.is_empty() {
        let tags = rule.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        lines.push(format!("Tags: {}", tags));
    }

    if !rule.libs.is_empty() {
        lines.push(format!("Libs: {}", rule.libs.join(", ")));
    }

    lines.push(String::new()); // blank line

    lines.push(rule.content.trim_end().to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::model::Author;
    use std::collections::BTreeSet;

    fn rule() -> Rule {
        Rule {
            title: "React TypeScript".to_string(),
            slug: "react-ts".to_string(),
            tags: ["React".to_string(), "TypeScript".to_string()]
                .into_iter()
                .collect::<BTreeSet<_>>(),
            libs: vec!["react".to_string(), "typescript".to_string()],
            content: "# React rules\n\nUse function components.\n".to_string(),
            author: Author {
                name: "Jane Doe".to_string(),
                url: Some("https://github.com/janedoe".to_string()),
                avatar: None,
            },
        }
    }

    #[test]
    fn test_format_rule() {
        let output = format_rule(&rule());

        assert!(output.contains("Title: React TypeScript"));
        assert!(output.contains("Slug: react-ts"));
        assert!(output.contains("Author: Jane Doe (https://github.com/janedoe)"));
        assert!(output.contains("Tags: React, TypeScript"));
        assert!(output.contains("Libs: react, typescript"));
        assert!(output.contains("# React rules"));
    }

    #[test]
    fn test_format_rule_without_author_url() {
        let mut r = rule();
        r.author.url = None;

        let output = format_rule(&r);
        assert!(output.contains("Author: Jane Doe"));
        assert!(!output.contains("("));
    }

    #[test]
    fn test_format_rule_skips_empty_tags_and_libs() {
        let mut r = rule();
        r.tags = BTreeSet::new();
        r.libs = vec![];

        let output = format_rule(&r);
        assert!(!output.contains("Tags:"));
        assert!(!output.contains("Libs:"));
    }

    #[test]
    fn test_format_rule_trims_trailing_whitespace() {
        let mut r = rule();
        r.content = "content\n\n\n".to_string();

        let output = format_rule(&r);
        assert!(output.ends_with("content"));
    }
}
