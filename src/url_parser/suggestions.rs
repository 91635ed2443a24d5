//! Canned title and company suggestions for form autocomplete.

/// Maximum suggestions returned by one lookup.
pub const MAX_SUGGESTIONS: usize = 10;

pub const COMMON_JOB_TITLES: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "Product Manager",
    "Designer",
    "Marketing Manager",
    "Sales Representative",
    "Project Manager",
    "Business Analyst",
    "DevOps Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "UX Designer",
    "Data Analyst",
    "Technical Writer",
    "QA Engineer",
    "Consultant",
];

pub const COMMON_COMPANIES: &[&str] = &[
    "Google",
    "Microsoft",
    "Apple",
    "Amazon",
    "Meta",
    "Netflix",
    "Tesla",
    "Uber",
    "Airbnb",
    "Spotify",
    "Adobe",
    "Salesforce",
    "IBM",
    "Oracle",
    "Intel",
    "NVIDIA",
    "Twitter",
    "LinkedIn",
];

/// First ten common titles, attached to every parse result.
pub fn top_titles() -> Vec<String> {
    COMMON_JOB_TITLES
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect()
}

pub fn suggest_titles(query: &str) -> Vec<String> {
    filter(COMMON_JOB_TITLES, query)
}

pub fn suggest_companies(query: &str) -> Vec<String> {
    filter(COMMON_COMPANIES, query)
}

/// Case-insensitive substring match. An empty query matches everything.
fn filter(candidates: &[&str], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    candidates
        .iter()
        .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect()
}
