use crate::models::RawJobFields;
use crate::scrapers::selectors::{ElementQuery, Locator, SelectorChain};

use super::{Site, SiteExtractor};

const COMPANY: SelectorChain = SelectorChain::new(&[
    Locator::Css("[data-testid='inlineHeader-companyName']"),
    Locator::Css("[data-testid='company-name']"),
    Locator::Css("span[data-testid='company-name']"),
    Locator::Css(".icl-u-lg-mr--sm"),
    Locator::Css("span[class*='company']"),
    Locator::Css("[data-testid='jobsearch-CompanyInfoContainer'] span"),
    Locator::Css(".jobsearch-CompanyInfoWithoutHeaderImage span"),
]);

// A bare h1 sits ahead of the class-based selectors, matching the live page.
const TITLE: SelectorChain = SelectorChain::new(&[
    Locator::Css("[data-testid='jobsearch-JobInfoHeader-title']"),
    Locator::Css("h1[data-testid='jobsearch-JobInfoHeader-title']"),
    Locator::Css("h1.jobsearch-JobInfoHeader-title"),
    Locator::Css("h1"),
    Locator::Css(".jobsearch-JobInfoHeader-title"),
    Locator::Css("[data-testid='job-title']"),
]);

const DESCRIPTION: SelectorChain = SelectorChain::new(&[
    Locator::Css("#jobDescriptionText"),
    Locator::Css("[data-testid='jobsearch-JobComponent-description']"),
    Locator::Css(".jobsearch-JobComponent-description"),
    Locator::Css("[data-testid='job-description']"),
    Locator::Css(".jobDescriptionContent"),
    Locator::Css("#job-description"),
]);

pub struct IndeedExtractor;

impl SiteExtractor for IndeedExtractor {
    fn site(&self) -> Site {
        Site::Indeed
    }

    fn extract(&self, page: &dyn ElementQuery) -> RawJobFields {
        RawJobFields {
            company_name: COMPANY.resolve(page),
            job_title: TITLE.resolve(page),
            job_description: DESCRIPTION.resolve(page),
        }
    }
}
