//! Suggestion commands.

use jobscout::url_parser::{suggest_companies, suggest_titles};

use super::print_json;

pub fn cmd_suggest_titles(query: Option<&str>) -> anyhow::Result<()> {
    print_json(&suggest_titles(query.unwrap_or_default()))
}

pub fn cmd_suggest_companies(query: Option<&str>) -> anyhow::Result<()> {
    print_json(&suggest_companies(query.unwrap_or_default()))
}
