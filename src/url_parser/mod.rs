//! Cheap job URL parsing.
//!
//! Reads whatever a job board puts in its URLs (job ids, company slugs,
//! search parameters) and, when that does not yield a title, peeks at the
//! page's `<title>` and description meta. No browser, no retries.

mod metadata;
mod sites;
pub mod suggestions;

pub use metadata::{parse_page_metadata, MetadataFetcher, PageMetadata};
pub use sites::{SiteHints, SiteParser};
pub use suggestions::{suggest_companies, suggest_titles};

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

use crate::config::Settings;

/// Job boards the URL parser recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicSite {
    Linkedin,
    Indeed,
    Glassdoor,
    GoogleJobs,
    #[serde(rename = "ziprecruiter")]
    ZipRecruiter,
    Other,
}

impl HeuristicSite {
    /// Classify a host with any `www.` prefix already removed.
    pub fn from_domain(domain: &str) -> Self {
        if domain.contains("linkedin") {
            HeuristicSite::Linkedin
        } else if domain.contains("indeed") {
            HeuristicSite::Indeed
        } else if domain.contains("glassdoor") {
            HeuristicSite::Glassdoor
        } else if domain.contains("google") {
            HeuristicSite::GoogleJobs
        } else if domain.contains("ziprecruiter") {
            HeuristicSite::ZipRecruiter
        } else {
            HeuristicSite::Other
        }
    }
}

/// Problems the caller can act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeuristicError {
    #[error(
        "This appears to be a search results URL without a specific job selected. \
         Please click on a specific job posting and copy that URL instead. \
         Look for URLs that contain 'viewjob' or a 'vjk' parameter."
    )]
    SearchResultsUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Serialize for HeuristicError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything the URL parser could work out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicParseResult {
    pub job_url: String,
    pub source_site: HeuristicSite,
    pub job_id: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub description_preview: Option<String>,
    pub suggested_titles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<HeuristicError>,
}

impl HeuristicParseResult {
    fn new(job_url: &str, source_site: HeuristicSite) -> Self {
        Self {
            job_url: job_url.to_string(),
            source_site,
            job_id: None,
            company_name: None,
            job_title: None,
            location: None,
            description_preview: None,
            suggested_titles: suggestions::top_titles(),
            error: None,
        }
    }

    fn apply_hints(&mut self, hints: SiteHints) {
        self.job_id = hints.job_id.or(self.job_id.take());
        self.company_name = hints.company_name.or(self.company_name.take());
        self.job_title = hints.job_title.or(self.job_title.take());
        self.location = hints.location.or(self.location.take());
    }

    /// Metadata only fills in what it actually found.
    fn apply_metadata(&mut self, metadata: PageMetadata) {
        self.job_title = metadata.job_title.or(self.job_title.take());
        self.company_name = metadata.company_name.or(self.company_name.take());
        self.description_preview = metadata
            .description_preview
            .or(self.description_preview.take());
    }
}

/// Parses job URLs, optionally peeking at page metadata.
pub struct UrlParser {
    metadata: Option<MetadataFetcher>,
}

impl UrlParser {
    pub fn new(settings: &Settings) -> Self {
        let metadata = match MetadataFetcher::new(settings.metadata_timeout) {
            Ok(fetcher) => Some(fetcher),
            Err(e) => {
                warn!("Metadata fetching disabled: {}", e);
                None
            }
        };
        Self { metadata }
    }

    /// Parser that never touches the network.
    pub fn offline() -> Self {
        Self { metadata: None }
    }

    /// Parse `url`. Never fails; problems land in `error`.
    pub async fn parse(&self, url: &str) -> HeuristicParseResult {
        let parsed = match parse_job_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Error parsing URL {}: {}", url, e);
                let mut result = HeuristicParseResult::new(url, HeuristicSite::Other);
                result.error = Some(HeuristicError::InvalidUrl(e.to_string()));
                return result;
            }
        };

        let target = parsed.as_str();
        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        let domain = host.strip_prefix("www.").unwrap_or(&host);

        let mut result = HeuristicParseResult::new(url, HeuristicSite::from_domain(domain));

        if let Some(parser) = SiteParser::for_domain(domain) {
            match parser.parse(target, &parsed) {
                Ok(hints) => result.apply_hints(hints),
                Err(e) => {
                    warn!("Rejected URL {}: {}", url, e);
                    result.error = Some(e);
                    return result;
                }
            }
        }

        if result.job_title.is_none() {
            if let Some(ref fetcher) = self.metadata {
                if let Some(metadata) = fetcher.fetch(target).await {
                    result.apply_metadata(metadata);
                }
            }
        }

        result
    }
}

/// Parse a job URL, assuming `https://` when the scheme was left off.
fn parse_job_url(url: &str) -> Result<Url, url::ParseError> {
    match Url::parse(url.trim()) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", url.trim()))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_extended_sites() {
        assert_eq!(HeuristicSite::from_domain("uk.linkedin.com"), HeuristicSite::Linkedin);
        assert_eq!(HeuristicSite::from_domain("google.com"), HeuristicSite::GoogleJobs);
        assert_eq!(
            HeuristicSite::from_domain("ziprecruiter.com"),
            HeuristicSite::ZipRecruiter
        );
        assert_eq!(HeuristicSite::from_domain("example.org"), HeuristicSite::Other);
    }

    #[tokio::test]
    async fn invalid_url_is_reported() {
        let result = UrlParser::offline().parse("not a url").await;
        assert!(matches!(result.error, Some(HeuristicError::InvalidUrl(_))));
        assert_eq!(result.source_site, HeuristicSite::Other);
        assert_eq!(result.suggested_titles.len(), 10);
    }

    #[tokio::test]
    async fn missing_scheme_defaults_to_https() {
        let result = UrlParser::offline()
            .parse("www.linkedin.com/jobs/view/3849201/")
            .await;
        assert!(result.error.is_none());
        assert_eq!(result.job_url, "www.linkedin.com/jobs/view/3849201/");
        assert_eq!(result.source_site, HeuristicSite::Linkedin);
        assert_eq!(result.job_id.as_deref(), Some("3849201"));
    }

    #[tokio::test]
    async fn error_serializes_as_message() {
        let result = UrlParser::offline()
            .parse("https://ca.indeed.com/jobs?q=engineer&l=Toronto")
            .await;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source_site"], "indeed");
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("This appears to be a search results URL"));
    }

    #[tokio::test]
    async fn ok_result_omits_error_key() {
        let result = UrlParser::offline()
            .parse("https://www.ziprecruiter.com/jobs/acme/123")
            .await;
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["source_site"], "ziprecruiter");
        assert_eq!(json["company_name"], "Acme");
    }

    #[test]
    fn metadata_does_not_erase_url_hints() {
        let mut result = HeuristicParseResult::new("https://x", HeuristicSite::ZipRecruiter);
        result.company_name = Some("Acme".to_string());
        result.apply_metadata(PageMetadata {
            job_title: Some("Welder".to_string()),
            company_name: None,
            description_preview: None,
        });
        assert_eq!(result.company_name.as_deref(), Some("Acme"));
        assert_eq!(result.job_title.as_deref(), Some("Welder"));
    }
}
