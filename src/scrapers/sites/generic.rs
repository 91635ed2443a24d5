use crate::models::RawJobFields;
use crate::scrapers::selectors::{ElementQuery, Locator, SelectorChain};

use super::{Site, SiteExtractor};

const TITLE: SelectorChain = SelectorChain::new(&[
    Locator::Css("h1"),
    Locator::Css("title"),
    Locator::Css(".job-title"),
    Locator::Css(".title"),
]);

/// Fallback for unrecognized boards. Only the title is attempted.
pub struct GenericExtractor;

impl SiteExtractor for GenericExtractor {
    fn site(&self) -> Site {
        Site::Generic
    }

    fn extract(&self, page: &dyn ElementQuery) -> RawJobFields {
        RawJobFields {
            job_title: TITLE.resolve(page),
            ..RawJobFields::default()
        }
    }
}
