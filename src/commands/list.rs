//! List command - Browse the available rules

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use super::utils;
use crate::rules::model::Rule;

/// Options for the list command
pub struct ListOptions {
    /// Only rules carrying this tag
    pub tag: Option<String>,
    /// Only rules targeting this library
    pub lib: Option<String>,
    /// Pattern to match against slug or title
    pub filter: Option<String>,
    /// Sort by: source, slug, title
    pub sort: String,
    /// Reverse sort order
    pub reverse: bool,
    /// Limit number of results
    pub limit: Option<usize>,
}

/// Execute the list command and return formatted output
pub fn execute(options: ListOptions) -> Result<String> {
    let mut service = utils::open_service()?;
    let outcome = service.load(utils::now_ms())?;

    if outcome.is_offline {
        eprintln!("Warning: rule source unreachable, listing local rules");
    }

    Ok(render(outcome.rules, &options))
}

/// Filter, sort and tabulate a rule set
fn render(mut rules: Vec<Rule>, options: &ListOptions) -> String {
    if let Some(ref tag) = options.tag {
        rules.retain(|r| r.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)));
    }

    if let Some(ref lib) = options.lib {
        rules.retain(|r| r.libs.iter().any(|l| l.eq_ignore_ascii_case(lib)));
    }

    if let Some(ref pattern) = options.filter {
        let pattern = pattern.to_lowercase();
        rules.retain(|r| {
            r.slug.to_lowercase().contains(&pattern) || r.title.to_lowercase().contains(&pattern)
        });
    }

    match options.sort.as_str() {
        "slug" => rules.sort_by(|a, b| a.slug.cmp(&b.slug)),
        "title" => rules.sort_by(|a, b| a.title.cmp(&b.title)),
        _ => {
            // Default ("source"): keep the order the rule list ships in
        }
    }

    if options.reverse {
        rules.reverse();
    }

    let total_count = rules.len();
    if let Some(n) = options.limit {
        rules.truncate(n);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Slug"),
        Cell::new("Title"),
        Cell::new("Tags"),
        Cell::new("Libs"),
    ]);

    for rule in &rules {
        let tags = rule.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        let libs = rule.libs.join(", ");
        table.add_row(vec![
            Cell::new(&rule.slug),
            Cell::new(&rule.title),
            Cell::new(tags),
            Cell::new(libs),
        ]);
    }

    let mut output = table.to_string();
    if rules.len() < total_count {
        output.push_str(&format!(
            "\n\nShowing {} of {} rules",
            rules.len(),
            total_count
        ));
    } else {
        output.push_str(&format!("\n\n{} rules found", total_count));
    }

    output
}
