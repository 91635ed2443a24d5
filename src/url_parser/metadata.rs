//! Page metadata peek: `<title>` and description meta from one GET.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::Html;
use tracing::{debug, warn};

use crate::scrapers::selectors::{truncate_chars, Locator, SelectorChain};
use crate::scrapers::{FetchError, HttpClient, Identity, METADATA_USER_AGENT};

/// Characters of meta description kept in the preview.
pub const PREVIEW_CHARS: usize = 200;

static BOARD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[-|]\s*(Indeed\.com|LinkedIn|Glassdoor|Jobs).*$").unwrap()
});
static COMPANY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(?:at|@|-)\s([^-|]+)$").unwrap());

const TITLE: SelectorChain = SelectorChain::new(&[Locator::Css("title")]);

const DESCRIPTION: SelectorChain = SelectorChain::new(&[
    Locator::Attribute {
        selector: r#"meta[name="description"]"#,
        name: "content",
    },
    Locator::Attribute {
        selector: r#"meta[property="og:description"]"#,
        name: "content",
    },
]);

/// What the page's head says about the posting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description_preview: Option<String>,
}

/// Read title, company and description preview from a page.
pub fn parse_page_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let title = TITLE
        .resolve(&document)
        .map(|t| BOARD_SUFFIX.replace(&t, "").trim().to_string());
    let (job_title, company_name) = match title {
        Some(title) => split_company(&title),
        None => (None, None),
    };

    PageMetadata {
        job_title: job_title.filter(|t| !t.is_empty()),
        company_name: company_name.filter(|c| !c.is_empty()),
        description_preview: DESCRIPTION.resolve(&document).map(|d| preview(&d)),
    }
}

/// Split "Title at Company", "Title @ Company" or "Title - Company".
fn split_company(title: &str) -> (Option<String>, Option<String>) {
    match COMPANY_SUFFIX.captures(title) {
        Some(caps) => (
            Some(COMPANY_SUFFIX.replace(title, "").trim().to_string()),
            caps.get(1).map(|m| m.as_str().trim().to_string()),
        ),
        None => (Some(title.to_string()), None),
    }
}

/// First 200 characters, with `...` appended when anything was cut.
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(text, PREVIEW_CHARS))
    } else {
        text.to_string()
    }
}

/// Fetches page metadata with a fixed desktop user agent and short timeout.
pub struct MetadataFetcher {
    client: HttpClient,
}

impl MetadataFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let identity = Identity {
            user_agent: METADATA_USER_AGENT.to_string(),
            proxy: None,
        };
        Ok(Self {
            client: HttpClient::for_identity(&identity, timeout)?,
        })
    }

    /// Metadata for `url`, or `None` if the page could not be fetched.
    pub async fn fetch(&self, url: &str) -> Option<PageMetadata> {
        match self.client.get_text(url).await {
            Ok(body) => {
                let metadata = parse_page_metadata(&body);
                debug!("Page metadata for {}: {:?}", url, metadata);
                Some(metadata)
            }
            Err(e) => {
                warn!("Could not fetch metadata for {}: {}", url, e);
                None
            }
        }
    }
}
