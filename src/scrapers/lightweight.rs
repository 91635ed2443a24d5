//! Tier 1: a single plain HTTP fetch with generic selectors.
//!
//! Many postings are server-rendered and come back complete from one GET.
//! This tier never runs JavaScript, so it is fast and leaves a small
//! footprint; anything it cannot read goes to the browser tier.

use std::sync::Arc;
use std::time::Duration;

use scraper::Html;
use tracing::{info, warn};

use super::http_client::{FetchError, HttpClient};
use super::rotation::IdentityPool;
use super::selectors::{truncate_chars, ElementQuery, Locator, SelectorChain};
use super::DelayRange;
use crate::models::RawJobFields;

/// Longest description kept from a plain fetch, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

const TITLE: SelectorChain = SelectorChain::new(&[
    Locator::Css(r#"h1[data-testid*="title"]"#),
    Locator::Css(r#"h1[class*="job-title"]"#),
    Locator::Css(r#"h1[class*="title"]"#),
    Locator::Css("h1"),
    Locator::Css(r#"[data-testid*="job-title"]"#),
    Locator::Css(r#"[class*="job-title"]"#),
]);

const COMPANY: SelectorChain = SelectorChain::new(&[
    Locator::Css(r#"[data-testid*="company"]"#),
    Locator::Css(r#"[class*="company-name"]"#),
    Locator::Css(r#"[class*="employer"]"#),
    Locator::Css(r#"a[href*="company"]"#),
    Locator::Css(r#"span[class*="company"]"#),
]);

const DESCRIPTION: SelectorChain = SelectorChain::new(&[
    Locator::Css(r#"[data-testid*="description"]"#),
    Locator::Css(r#"[class*="job-description"]"#),
    Locator::Css(r#"[class*="description"]"#),
    Locator::Css(r#"[id*="description"]"#),
]);

/// Generic field extraction used by the plain fetch.
pub fn extract_fields(page: &dyn ElementQuery) -> RawJobFields {
    RawJobFields {
        company_name: COMPANY.resolve(page),
        job_title: TITLE.resolve(page),
        job_description: DESCRIPTION
            .resolve(page)
            .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS)),
    }
}

/// A page fetched over plain HTTP.
#[derive(Debug, Clone)]
pub struct LightweightPage {
    pub fields: RawJobFields,
    /// Raw response body, kept for the snapshot.
    pub html: String,
}

impl LightweightPage {
    pub fn from_html(html: String) -> Self {
        let fields = {
            let document = Html::parse_document(&html);
            extract_fields(&document)
        };
        Self { fields, html }
    }

    /// True if the page named a title or a company.
    pub fn is_useful(&self) -> bool {
        self.fields.has_identity()
    }
}

/// Plain HTTP fetcher with randomized pacing and identity rotation.
pub struct LightweightFetcher {
    pool: Arc<IdentityPool>,
    timeout: Duration,
    delay: DelayRange,
}

impl LightweightFetcher {
    pub fn new(pool: Arc<IdentityPool>, timeout: Duration, delay: DelayRange) -> Self {
        Self {
            pool,
            timeout,
            delay,
        }
    }

    /// Fetch `url` once. Only a 200 response is parsed.
    pub async fn fetch(&self, url: &str) -> Result<LightweightPage, FetchError> {
        self.delay.wait().await;

        let identity = self.pool.next_identity();
        let client = HttpClient::for_identity(&identity, self.timeout)?;

        info!("Attempting lightweight fetch for: {}", url);
        let response = client.get(url).await?;
        if !response.is_ok() {
            warn!("Lightweight fetch failed with status {}", response.status);
            return Err(FetchError::Status(response.status));
        }

        let body = response.text().await?;
        Ok(LightweightPage::from_html(body))
    }
}
