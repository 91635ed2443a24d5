//! Extract command.

use console::style;
use serde::Serialize;

use jobscout::config::Settings;
use jobscout::{ExtractionResult, JobScraper};

use super::print_json;

#[derive(Serialize)]
struct ExtractOutput {
    #[serde(flatten)]
    result: ExtractionResult,
    scraped_successfully: bool,
}

/// Scrape a job posting and print the result.
pub async fn cmd_extract(settings: &Settings, url: &str) -> anyhow::Result<()> {
    let scraper = JobScraper::new(settings);
    let result = scraper.extract(url).await;
    let scraped_successfully = result.is_scraped_successfully();

    if scraped_successfully {
        eprintln!(
            "{} {} at {}",
            style("✓").green(),
            result.job_title,
            result.company_name
        );
    } else {
        eprintln!(
            "{} Could not fully scrape {} (see job_description)",
            style("!").yellow(),
            url
        );
    }

    print_json(&ExtractOutput {
        result,
        scraped_successfully,
    })
}
