//! jobscout - job posting extraction from job board URLs.
//!
//! Two entry points are exposed:
//!
//! - [`parse_url_heuristically`] reads what it can from the URL itself (site,
//!   job id, query parameters) plus an optional `<title>` fetch. It is cheap
//!   and meant for pre-filling a form.
//! - [`extract_job_posting`] runs the full scrape: a plain HTTP fetch first,
//!   then a stealth Chrome session when the page needs JavaScript.
//!
//! Both run on one process-wide [`UrlParser`] / [`JobScraper`] built from the
//! discovered config file and the environment. Callers that need different
//! settings can build their own.

pub mod config;
pub mod models;
pub mod scrapers;
pub mod storage;
pub mod url_parser;

pub use config::Settings;
pub use models::{ExtractionMethod, ExtractionResult, SourceSite};
pub use scrapers::JobScraper;
pub use url_parser::{HeuristicError, HeuristicParseResult, HeuristicSite, UrlParser};

use std::sync::LazyLock;

/// Parser and scraper behind the free functions. Built on first use, so the
/// identity rotation runs across every call in the process.
static URL_PARSER: LazyLock<UrlParser> = LazyLock::new(|| UrlParser::new(&process_settings()));
static SCRAPER: LazyLock<JobScraper> = LazyLock::new(|| JobScraper::new(&process_settings()));

fn process_settings() -> Settings {
    config::load_settings(None).unwrap_or_else(|e| {
        tracing::warn!("Ignoring config file: {}", e);
        Settings::default().with_env_overrides()
    })
}

/// Parse a job URL without scraping it.
pub async fn parse_url_heuristically(url: &str) -> HeuristicParseResult {
    URL_PARSER.parse(url).await
}

/// Scrape a job posting, falling back to a browser session when needed.
///
/// Never fails: on error the result carries placeholder fields and a
/// description explaining what went wrong.
pub async fn extract_job_posting(url: &str) -> ExtractionResult {
    SCRAPER.extract(url).await
}
