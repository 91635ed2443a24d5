//! URL parse command.

use jobscout::config::Settings;
use jobscout::UrlParser;

use super::print_json;

/// Parse a job URL and print what it reveals.
pub async fn cmd_parse(settings: &Settings, url: &str, offline: bool) -> anyhow::Result<()> {
    let parser = if offline {
        UrlParser::offline()
    } else {
        UrlParser::new(settings)
    };

    let result = parser.parse(url).await;
    print_json(&result)
}
