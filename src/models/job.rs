//! Extracted job posting fields and the final extraction result.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceSite;

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_POSITION: &str = "Unknown Position";
pub const NO_DESCRIPTION: &str = "No description available";

/// Prefix of `job_description` on results produced by a failed scrape.
pub const FAILURE_MARKER: &str = "Error occurred while scraping";

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Plain HTTP fetch, no JavaScript.
    Lightweight,
    /// Rendered in a Chrome session.
    Browser,
}

/// Fields as found on the page, before placeholders are substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJobFields {
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
}

impl RawJobFields {
    /// True if the page yielded a title or a company.
    pub fn has_identity(&self) -> bool {
        self.job_title.is_some() || self.company_name.is_some()
    }

    /// Substitute placeholders for every field that was not found.
    pub fn resolve(self) -> JobFields {
        JobFields {
            company_name: self
                .company_name
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            job_title: self
                .job_title
                .unwrap_or_else(|| UNKNOWN_POSITION.to_string()),
            job_description: self
                .job_description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        }
    }
}

/// Fields with placeholders applied. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFields {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
}

/// Outcome of one scrape call.
///
/// `company_name` and `job_title` always hold a value; missing data shows up
/// as the `Unknown Company` / `Unknown Position` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub source_site: SourceSite,
    /// `None` when every tier failed.
    pub extraction_method: Option<ExtractionMethod>,
    /// Path of the saved HTML snapshot, if one was written.
    pub snapshot: Option<PathBuf>,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    pub fn new(
        fields: JobFields,
        source_site: SourceSite,
        method: ExtractionMethod,
        snapshot: Option<PathBuf>,
    ) -> Self {
        Self {
            company_name: fields.company_name,
            job_title: fields.job_title,
            job_description: fields.job_description,
            source_site,
            extraction_method: Some(method),
            snapshot,
            extracted_at: Utc::now(),
        }
    }

    /// Placeholder result for a scrape that failed outright.
    pub fn failure(source_site: SourceSite, detail: impl std::fmt::Display) -> Self {
        Self {
            company_name: UNKNOWN_COMPANY.to_string(),
            job_title: UNKNOWN_POSITION.to_string(),
            job_description: format!("{}: {}", FAILURE_MARKER, detail),
            source_site,
            extraction_method: None,
            snapshot: None,
            extracted_at: Utc::now(),
        }
    }

    /// Whether the result is good enough to save without asking the user.
    ///
    /// Lightweight results are always accepted. Otherwise both company and
    /// title must be real values and the description must not be an error.
    pub fn is_scraped_successfully(&self) -> bool {
        if self.extraction_method == Some(ExtractionMethod::Lightweight) {
            return true;
        }
        let company_ok = !self.company_name.is_empty() && self.company_name != UNKNOWN_COMPANY;
        let title_ok = !self.job_title.is_empty() && self.job_title != UNKNOWN_POSITION;
        company_ok && title_ok && !self.job_description.contains(FAILURE_MARKER)
    }
}
