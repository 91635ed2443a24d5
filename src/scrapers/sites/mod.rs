//! Per-site extraction rules for the browser tier.

mod generic;
mod glassdoor;
mod indeed;
mod linkedin;

use std::time::Duration;

use crate::models::{RawJobFields, SourceSite};
use crate::scrapers::selectors::ElementQuery;

pub use generic::GenericExtractor;
pub use glassdoor::GlassdoorExtractor;
pub use indeed::IndeedExtractor;
pub use linkedin::LinkedinExtractor;

/// How long a freshly loaded page is left to render before it is read.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Extraction rules for one job board.
pub trait SiteExtractor: Send + Sync {
    fn site(&self) -> Site;

    /// Pause between navigation and reading the DOM.
    fn settle_delay(&self) -> Duration {
        DEFAULT_SETTLE_DELAY
    }

    /// Pull whatever fields the page offers. Missing ones stay `None`.
    fn extract(&self, page: &dyn ElementQuery) -> RawJobFields;
}

/// Extractor families. Anything not recognized goes through [`Site::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Linkedin,
    Glassdoor,
    Indeed,
    Generic,
}

impl Site {
    pub fn for_source(source: SourceSite) -> Self {
        match source {
            SourceSite::Linkedin => Site::Linkedin,
            SourceSite::Glassdoor => Site::Glassdoor,
            SourceSite::Indeed => Site::Indeed,
            SourceSite::Unknown => Site::Generic,
        }
    }

    pub fn extractor(self) -> &'static dyn SiteExtractor {
        match self {
            Site::Linkedin => &LinkedinExtractor,
            Site::Glassdoor => &GlassdoorExtractor,
            Site::Indeed => &IndeedExtractor,
            Site::Generic => &GenericExtractor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_source_has_matching_extractor() {
        for source in [
            SourceSite::Linkedin,
            SourceSite::Glassdoor,
            SourceSite::Indeed,
            SourceSite::Unknown,
        ] {
            let site = Site::for_source(source);
            assert_eq!(site.extractor().site(), site);
        }
    }

    #[test]
    fn default_settle_delay() {
        assert_eq!(
            Site::Indeed.extractor().settle_delay(),
            Duration::from_secs(5)
        );
    }
}
