use crate::models::RawJobFields;
use crate::scrapers::selectors::{ElementQuery, Locator, SelectorChain};

use super::{Site, SiteExtractor};

const COMPANY: SelectorChain = SelectorChain::new(&[
    Locator::Css(".job-details-jobs-unified-top-card__company-name a"),
    Locator::Css(".job-details-jobs-unified-top-card__company-name"),
    Locator::Css("[data-testid='job-details-company-name']"),
    Locator::Css(".jobs-unified-top-card__company-name a"),
    Locator::Css(".jobs-unified-top-card__company-name"),
    Locator::Css(".job-details-company a"),
    Locator::Css(".job-details-company"),
    Locator::Css("a[data-control-name='job_details_topcard_company_url']"),
]);

const TITLE: SelectorChain = SelectorChain::new(&[
    Locator::Css(".job-details-jobs-unified-top-card__job-title a"),
    Locator::Css(".job-details-jobs-unified-top-card__job-title"),
    Locator::Css(".jobs-unified-top-card__job-title a"),
    Locator::Css(".jobs-unified-top-card__job-title"),
    Locator::Css("h1[data-testid='job-details-job-title']"),
    Locator::Css("h1.job-details-job-title"),
    Locator::Css("h1.jobs-unified-top-card__job-title"),
    Locator::Css("h1"),
]);

const DESCRIPTION: SelectorChain = SelectorChain::new(&[
    Locator::Css(".job-details-jobs-unified-top-card__job-description"),
    Locator::Css(".jobs-description-content__text"),
    Locator::Css(".jobs-box__html-content"),
    Locator::Css(".job-details-job-description"),
    Locator::Css("[data-testid='job-details-job-description']"),
    Locator::Css(".jobs-description__content"),
    Locator::Css(".job-view-layout .jobs-box__html-content"),
]);

pub struct LinkedinExtractor;

impl SiteExtractor for LinkedinExtractor {
    fn site(&self) -> Site {
        Site::Linkedin
    }

    fn extract(&self, page: &dyn ElementQuery) -> RawJobFields {
        RawJobFields {
            company_name: COMPANY.resolve(page),
            job_title: TITLE.resolve(page),
            job_description: DESCRIPTION.resolve(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn reads_unified_top_card() {
        let html = Html::parse_document(
            r#"<html><body>
            <div class="job-details-jobs-unified-top-card__company-name"><a href="/company/acme">Acme Corp</a></div>
            <h1 class="job-details-jobs-unified-top-card__job-title">Senior Engineer</h1>
            <div class="jobs-description-content__text">Build things.
               Ship them.</div>
            </body></html>"#,
        );

        let fields = LinkedinExtractor.extract(&html);
        assert_eq!(fields.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(fields.job_title.as_deref(), Some("Senior Engineer"));
        assert_eq!(
            fields.job_description.as_deref(),
            Some("Build things. Ship them.")
        );
    }

    #[test]
    fn falls_back_to_bare_h1() {
        let html = Html::parse_document("<html><body><h1>Data Analyst</h1></body></html>");
        let fields = LinkedinExtractor.extract(&html);
        assert_eq!(fields.job_title.as_deref(), Some("Data Analyst"));
        assert_eq!(fields.company_name, None);
        assert_eq!(fields.job_description, None);
    }
}
