//! Scraping engine: HTTP tier, browser tier and per-site extractors.

pub mod browser;
mod http_client;
pub mod lightweight;
mod orchestrator;
pub mod rotation;
pub mod selectors;
pub mod sites;

pub use browser::{
    BrowserEngineConfig, BrowserError, BrowserSession, ChromeLauncher, SessionGuard,
    SessionLauncher, SessionManager, StealthProfile,
};
pub use http_client::{
    FetchError, HttpClient, HttpResponse, DEFAULT_USER_AGENTS, METADATA_USER_AGENT,
};
pub use lightweight::{LightweightFetcher, LightweightPage};
pub use orchestrator::JobScraper;
pub use rotation::{Identity, IdentityPool, RotationStrategyType};
pub use selectors::{ElementQuery, Locator, SelectorChain};
pub use sites::{Site, SiteExtractor};

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive millisecond range for randomized anti-detection pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    fn bounds(&self) -> RangeInclusive<u64> {
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        lo..=hi
    }

    /// Draw a random duration from the range.
    pub fn sample(&self) -> Duration {
        let bounds = self.bounds();
        if bounds.start() == bounds.end() {
            return Duration::from_millis(*bounds.start());
        }
        Duration::from_millis(rand::rng().random_range(bounds))
    }

    /// Sleep for a random duration from the range.
    pub async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tracing::debug!("Waiting {:?} before request", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_in_range() {
        let range = DelayRange::new(20, 40);
        for _ in 0..200 {
            let d = range.sample().as_millis() as u64;
            assert!((20..=40).contains(&d));
        }
    }

    #[test]
    fn reversed_range_is_normalized() {
        let range = DelayRange::new(40, 20);
        for _ in 0..50 {
            let d = range.sample().as_millis() as u64;
            assert!((20..=40).contains(&d));
        }
    }

    #[test]
    fn empty_range_is_zero() {
        assert!(DelayRange::none().sample().is_zero());
    }
}
