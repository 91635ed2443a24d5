//! Ordered selector chains with first-match-wins evaluation.
//!
//! Job boards reshuffle their markup often, so every field is described by a
//! list of locators ordered from the current layout to older ones and finally
//! a bare tag. The first locator that yields non-empty content wins and the
//! rest are never queried.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// A single way of locating a value on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector; the value is the element's text.
    Css(&'static str),
    /// CSS selector; the value is the named attribute of the element.
    Attribute {
        selector: &'static str,
        name: &'static str,
    },
}

impl Locator {
    pub fn selector(&self) -> &'static str {
        match self {
            Locator::Css(selector) => selector,
            Locator::Attribute { selector, .. } => selector,
        }
    }
}

/// Something that can answer locator queries: a parsed document, or a test
/// double.
pub trait ElementQuery {
    /// Value of the first element matched by `locator`.
    ///
    /// Only the first matching element is inspected. Returns `None` when
    /// nothing matches or the value is blank after trimming.
    fn query(&self, locator: &Locator) -> Option<String>;
}

impl ElementQuery for Html {
    fn query(&self, locator: &Locator) -> Option<String> {
        let selector = match Selector::parse(locator.selector()) {
            Ok(selector) => selector,
            Err(e) => {
                debug!("Invalid selector {:?}: {}", locator.selector(), e);
                return None;
            }
        };

        let element = self.select(&selector).next()?;
        let value = match locator {
            Locator::Css(_) => element_text(&element),
            Locator::Attribute { name, .. } => element.value().attr(name)?.trim().to_string(),
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Element text with runs of whitespace collapsed to single spaces.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered, non-empty list of locators for one field.
#[derive(Debug, Clone, Copy)]
pub struct SelectorChain {
    locators: &'static [Locator],
}

impl SelectorChain {
    /// Build a chain. Panics on an empty list; in a `const` this is a
    /// compile error.
    pub const fn new(locators: &'static [Locator]) -> Self {
        assert!(!locators.is_empty(), "selector chain must not be empty");
        Self { locators }
    }

    /// First non-empty value, trying locators left to right.
    pub fn resolve<Q: ElementQuery + ?Sized>(&self, page: &Q) -> Option<String> {
        self.locators.iter().find_map(|locator| page.query(locator))
    }
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
