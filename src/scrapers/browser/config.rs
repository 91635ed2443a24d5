//! Browser engine configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::stealth::StealthProfile;

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false for debugging or if headless detection is an issue.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable. Auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Navigation timeout in seconds.
    #[serde(default = "default_timeout", alias = "timeout")]
    pub navigation_timeout: u64,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,

    /// Navigator properties presented to page scripts.
    #[serde(default)]
    pub stealth: StealthProfile,
}

pub fn default_headless() -> bool {
    true
}

pub fn default_timeout() -> u64 {
    30
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            navigation_timeout: default_timeout(),
            chrome_args: Vec::new(),
            stealth: StealthProfile::default(),
        }
    }
}

impl BrowserEngineConfig {
    /// Apply `CHROME_PATH` and `JOBSCOUT_HEADLESS` from the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("CHROME_PATH") {
            if !path.is_empty() {
                self.chrome_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(val) = std::env::var("JOBSCOUT_HEADLESS") {
            match val.to_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.headless = false,
                "1" | "true" | "yes" | "on" => self.headless = true,
                _ => {}
            }
        }

        self
    }
}
