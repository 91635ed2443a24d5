use crate::models::RawJobFields;
use crate::scrapers::selectors::{ElementQuery, Locator, SelectorChain};

use super::{Site, SiteExtractor};

const COMPANY: SelectorChain = SelectorChain::new(&[
    Locator::Css("[data-test='employer-name']"),
    Locator::Css(".employer-name"),
    Locator::Css("[data-testid='employer-name']"),
    Locator::Css(".jobview-header-employer-name"),
    Locator::Css(".job-details-employer-name"),
    Locator::Css("span[data-test='employer-name']"),
    Locator::Css(".employer-info span"),
]);

const TITLE: SelectorChain = SelectorChain::new(&[
    Locator::Css("[data-test='job-title']"),
    Locator::Css(".job-title"),
    Locator::Css("[data-testid='job-title']"),
    Locator::Css(".jobview-header-job-title"),
    Locator::Css(".job-details-job-title"),
    Locator::Css("h1[data-test='job-title']"),
    Locator::Css("h1.job-title"),
    Locator::Css("h1"),
]);

const DESCRIPTION: SelectorChain = SelectorChain::new(&[
    Locator::Css("[data-test='job-description-content']"),
    Locator::Css(".job-description-content"),
    Locator::Css("[data-testid='job-description-content']"),
    Locator::Css(".jobview-job-description-content"),
    Locator::Css(".job-details-description-content"),
    Locator::Css(".jobDescriptionContent"),
    Locator::Css("#job-description-content"),
]);

pub struct GlassdoorExtractor;

impl SiteExtractor for GlassdoorExtractor {
    fn site(&self) -> Site {
        Site::Glassdoor
    }

    fn extract(&self, page: &dyn ElementQuery) -> RawJobFields {
        RawJobFields {
            company_name: COMPANY.resolve(page),
            job_title: TITLE.resolve(page),
            job_description: DESCRIPTION.resolve(page),
        }
    }
}
