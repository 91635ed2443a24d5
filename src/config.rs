//! Configuration management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scrapers::{BrowserEngineConfig, DelayRange, IdentityPool, RotationStrategyType};

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "jobscout.toml";

/// Default snapshot directory, relative to the working directory.
const DEFAULT_SNAPSHOTS_DIR: &str = "./snapshots";

/// Errors while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory for HTML snapshots.
    pub snapshots_dir: PathBuf,
    /// Timeout for the lightweight fetch.
    pub request_timeout: Duration,
    /// Timeout for the URL parser's metadata fetch.
    pub metadata_timeout: Duration,
    /// Random pause before the lightweight fetch.
    pub request_delay: DelayRange,
    /// Random pause after a browser launches, before navigation.
    pub browser_delay: DelayRange,
    /// Overrides each site's settle delay when set.
    pub settle_delay: Option<Duration>,
    /// Upper bound on one extraction. `None` disables it.
    pub extract_deadline: Option<Duration>,
    /// User agents to rotate. Empty means the built-in list.
    pub user_agents: Vec<String>,
    /// Proxies to rotate. Empty means direct connections.
    pub proxies: Vec<String>,
    /// User agent rotation strategy.
    pub rotation: RotationStrategyType,
    /// Browser tier settings.
    pub browser: BrowserEngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshots_dir: PathBuf::from(DEFAULT_SNAPSHOTS_DIR),
            request_timeout: Duration::from_secs(30),
            metadata_timeout: Duration::from_secs(10),
            request_delay: DelayRange::new(2000, 10000),
            browser_delay: DelayRange::new(3000, 8000),
            settle_delay: None,
            extract_deadline: Some(Duration::from_secs(180)),
            user_agents: Vec::new(),
            proxies: Vec::new(),
            rotation: RotationStrategyType::default(),
            browser: BrowserEngineConfig::default(),
        }
    }
}

impl Settings {
    /// Apply environment variable overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("JOBSCOUT_SNAPSHOTS_DIR") {
            if !dir.is_empty() {
                self.snapshots_dir = PathBuf::from(shellexpand::tilde(&dir).as_ref());
            }
        }

        if let Ok(list) = std::env::var("JOBSCOUT_PROXIES") {
            self.proxies = list
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }

        if let Ok(proxy) = std::env::var("SOCKS_PROXY") {
            if !proxy.is_empty() && !self.proxies.contains(&proxy) {
                self.proxies.push(proxy);
            }
        }

        self.browser = self.browser.with_env_overrides();
        self
    }

    /// Build the identity pool shared by both scraping tiers.
    pub fn identity_pool(&self) -> IdentityPool {
        IdentityPool::new(self.user_agents.clone(), self.proxies.clone(), self.rotation)
    }
}

/// Configuration file structure. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshots_dir: Option<String>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_delay_ms: Option<DelayRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_delay_ms: Option<DelayRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_delay_ms: Option<u64>,
    /// Seconds; 0 disables the deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_deadline: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationStrategyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserEngineConfig>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Find a config file: `./jobscout.toml`, then the user config directory.
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("jobscout").join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Load configuration from a specific file path.
    /// `.json` files are parsed as JSON, everything else as TOML.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let mut config: Config = match ext {
            "json" => serde_json::from_str(&contents)?,
            _ => toml::from_str(&contents)?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref dir) = self.snapshots_dir {
            settings.snapshots_dir = self.resolve_path(dir, base_dir);
        }
        if let Some(secs) = self.request_timeout {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.metadata_timeout {
            settings.metadata_timeout = Duration::from_secs(secs);
        }
        if let Some(range) = self.request_delay_ms {
            settings.request_delay = range;
        }
        if let Some(range) = self.browser_delay_ms {
            settings.browser_delay = range;
        }
        if let Some(ms) = self.settle_delay_ms {
            settings.settle_delay = Some(Duration::from_millis(ms));
        }
        if let Some(secs) = self.extract_deadline {
            settings.extract_deadline = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(ref agents) = self.user_agents {
            settings.user_agents = agents.clone();
        }
        if let Some(ref proxies) = self.proxies {
            settings.proxies = proxies.clone();
        }
        if let Some(rotation) = self.rotation {
            settings.rotation = rotation;
        }
        if let Some(ref browser) = self.browser {
            settings.browser = browser.clone();
        }
    }
}

/// Build settings from defaults, an optional config file and the environment.
///
/// `explicit` wins over `JOBSCOUT_CONFIG`, which wins over discovery. A
/// missing discovered file is not an error; an unreadable named one is.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let path = explicit
        .map(Path::to_path_buf)
        .or_else(config_from_env)
        .or_else(Config::discover);
    if let Some(path) = path {
        debug!("Loading config from {}", path.display());
        let config = Config::load_from_path(&path)?;
        let base_dir = config
            .base_dir()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        config.apply_to_settings(&mut settings, &base_dir);
    }

    Ok(settings.with_env_overrides())
}

fn config_from_env() -> Option<PathBuf> {
    std::env::var("JOBSCOUT_CONFIG")
        .ok()
        .filter(|p| !p.is_empty())
        .map(|p| PathBuf::from(shellexpand::tilde(&p).as_ref()))
}
