//! Job board identification.

use serde::{Deserialize, Serialize};

/// Job board a posting was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSite {
    Linkedin,
    Glassdoor,
    Indeed,
    Unknown,
}

impl SourceSite {
    /// Classify a URL by its host. Anything unparseable is `Unknown`.
    pub fn from_url(url: &str) -> Self {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_default();
        Self::from_host(&host)
    }

    /// Classify a lowercase host name by substring.
    pub fn from_host(host: &str) -> Self {
        if host.contains("glassdoor") {
            SourceSite::Glassdoor
        } else if host.contains("linkedin") {
            SourceSite::Linkedin
        } else if host.contains("indeed") {
            SourceSite::Indeed
        } else {
            SourceSite::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSite::Linkedin => "linkedin",
            SourceSite::Glassdoor => "glassdoor",
            SourceSite::Indeed => "indeed",
            SourceSite::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SourceSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
