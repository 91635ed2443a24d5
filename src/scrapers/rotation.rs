//! Identity rotation: which user agent and proxy the next request uses.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::http_client::DEFAULT_USER_AGENTS;

/// Strategy for picking an index out of `count` candidates.
pub trait RotationStrategy: Send + Sync {
    /// Select an index in `0..count`, or `None` if `count` is zero.
    fn select(&self, count: usize) -> Option<usize>;
}

/// Round-robin selection - rotates through candidates consecutively.
pub struct RoundRobinStrategy {
    counter: AtomicUsize,
}

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

impl Default for RoundRobinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStrategy for RoundRobinStrategy {
    fn select(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        Some(self.counter.fetch_add(1, Ordering::Relaxed) % count)
    }
}

/// Random selection - picks a random candidate each time.
pub struct RandomStrategy;

impl RotationStrategy for RandomStrategy {
    fn select(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        Some(rand::rng().random_range(0..count))
    }
}

/// Selection strategy type enum for config/CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationStrategyType {
    /// Rotate through user agents consecutively
    RoundRobin,
    /// Random user agent each request
    #[default]
    Random,
}

impl RotationStrategyType {
    /// Create a boxed strategy instance.
    pub fn create_strategy(&self) -> Box<dyn RotationStrategy> {
        match self {
            Self::RoundRobin => Box::new(RoundRobinStrategy::new()),
            Self::Random => Box::new(RandomStrategy),
        }
    }
}

/// User agent plus optional proxy used for one fetch or browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: String,
    /// Proxy URL such as `http://10.0.0.1:8080` or `socks5://127.0.0.1:1080`.
    pub proxy: Option<String>,
}

/// Pool of user agents and proxies shared by both scraping tiers.
///
/// User agents follow the configured strategy; proxies always rotate
/// round-robin. The counters are the only state shared between scrape calls.
pub struct IdentityPool {
    user_agents: Vec<String>,
    proxies: Vec<String>,
    agent_strategy: Box<dyn RotationStrategy>,
    proxy_cursor: RoundRobinStrategy,
}

impl IdentityPool {
    /// Create a pool. An empty agent list falls back to the built-in one.
    pub fn new(
        user_agents: Vec<String>,
        proxies: Vec<String>,
        strategy: RotationStrategyType,
    ) -> Self {
        let user_agents = if user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
        } else {
            user_agents
        };
        Self {
            user_agents,
            proxies: proxies
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(normalize_proxy)
                .collect(),
            agent_strategy: strategy.create_strategy(),
            proxy_cursor: RoundRobinStrategy::new(),
        }
    }

    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }

    pub fn proxies(&self) -> &[String] {
        &self.proxies
    }

    /// Draw the next identity.
    pub fn next_identity(&self) -> Identity {
        let agent_idx = self
            .agent_strategy
            .select(self.user_agents.len())
            .unwrap_or(0);
        let proxy = self
            .proxy_cursor
            .select(self.proxies.len())
            .map(|idx| self.proxies[idx].clone());

        Identity {
            user_agent: self.user_agents[agent_idx].clone(),
            proxy,
        }
    }
}

/// Bare `host:port` entries are treated as HTTP proxies.
fn normalize_proxy(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), RotationStrategyType::default())
    }
}
