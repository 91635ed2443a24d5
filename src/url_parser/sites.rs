//! Per-board URL parsers. Dispatch order matters: the first matching host
//! substring wins.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::HeuristicError;

static LINKEDIN_JOB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/jobs/view/(\d+)").unwrap());
static LINKEDIN_COMPANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/company/([^/?]+)").unwrap());
static GLASSDOOR_JOB_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"JV_ID(\d+)").unwrap());

/// Fields a URL gave away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteHints {
    pub job_id: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteParser {
    Linkedin,
    Indeed,
    Glassdoor,
    GoogleJobs,
    ZipRecruiter,
}

const DISPATCH: &[(&str, SiteParser)] = &[
    ("linkedin.com", SiteParser::Linkedin),
    ("indeed.com", SiteParser::Indeed),
    ("glassdoor.com", SiteParser::Glassdoor),
    ("jobs.google.com", SiteParser::GoogleJobs),
    ("ziprecruiter.com", SiteParser::ZipRecruiter),
];

impl SiteParser {
    /// Parser for a host with any `www.` prefix already removed.
    pub fn for_domain(domain: &str) -> Option<Self> {
        DISPATCH
            .iter()
            .find(|(pattern, _)| domain.contains(pattern))
            .map(|(_, parser)| *parser)
    }

    pub fn parse(self, raw: &str, url: &Url) -> Result<SiteHints, HeuristicError> {
        match self {
            SiteParser::Linkedin => Ok(parse_linkedin(raw)),
            SiteParser::Indeed => parse_indeed(url),
            SiteParser::Glassdoor => Ok(parse_glassdoor(raw, url)),
            SiteParser::GoogleJobs => Ok(parse_google_jobs(url)),
            SiteParser::ZipRecruiter => Ok(parse_ziprecruiter(url)),
        }
    }
}

fn parse_linkedin(raw: &str) -> SiteHints {
    SiteHints {
        job_id: capture(&LINKEDIN_JOB_ID, raw),
        company_name: capture(&LINKEDIN_COMPANY, raw).map(|slug| slug_to_name(&slug)),
        ..SiteHints::default()
    }
}

fn parse_indeed(url: &Url) -> Result<SiteHints, HeuristicError> {
    let job_id = query_value(url, "jk").or_else(|| query_value(url, "vjk"));

    if job_id.is_none() && has_query_key(url, "q") {
        return Err(HeuristicError::SearchResultsUrl);
    }

    Ok(SiteHints {
        job_id,
        location: query_value(url, "l"),
        ..SiteHints::default()
    })
}

/// Listing slugs look like `title-words-company-words-location-JV_ID123.htm`.
/// Without a separator between the parts the split is a guess: two tokens
/// of title, the next two of company.
fn parse_glassdoor(raw: &str, url: &Url) -> SiteHints {
    let mut hints = SiteHints {
        job_id: capture(&GLASSDOOR_JOB_ID, raw),
        ..SiteHints::default()
    };

    let segments: Vec<&str> = url.path().split('/').collect();
    if segments.len() > 2 {
        let listing = segments
            .last()
            .copied()
            .unwrap_or_default()
            .replace(".htm", "")
            .replace('-', " ");
        let tokens: Vec<&str> = listing.split_whitespace().collect();
        if tokens.len() >= 3 {
            hints.job_title = Some(title_case(&tokens[..2].join(" ")));
            let end = tokens.len().min(4);
            hints.company_name = Some(title_case(&tokens[2..end].join(" ")));
        }
    }

    hints
}

fn parse_google_jobs(url: &Url) -> SiteHints {
    SiteHints {
        job_title: query_value(url, "q"),
        location: query_value(url, "l").or_else(|| query_value(url, "location")),
        ..SiteHints::default()
    }
}

fn parse_ziprecruiter(url: &Url) -> SiteHints {
    let segments: Vec<&str> = url.path().trim_matches('/').split('/').collect();
    let company_name = segments
        .iter()
        .position(|s| *s == "jobs")
        .and_then(|idx| segments.get(idx + 1))
        .map(|slug| slug_to_name(slug));

    SiteHints {
        company_name,
        ..SiteHints::default()
    }
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// First non-blank value of a query parameter.
fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn has_query_key(url: &Url, key: &str) -> bool {
    url.query_pairs().any(|(k, _)| k == key)
}

fn slug_to_name(slug: &str) -> String {
    title_case(&slug.replace('-', " "))
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
