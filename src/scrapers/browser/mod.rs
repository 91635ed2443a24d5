//! Browser tier for job boards that render postings with JavaScript.
//!
//! Uses chromiumoxide (CDP) with stealth evasion techniques so the session
//! is not trivially flagged as automation. Sessions are handed out through
//! [`SessionManager`], and each one lives inside a [`SessionGuard`] that
//! shuts the browser down however the scrape ends.

mod chrome;
mod config;
mod session;
mod stealth;

pub use chrome::ChromeLauncher;
pub use config::BrowserEngineConfig;
pub use session::{BrowserSession, SessionGuard, SessionLauncher, SessionManager};
pub use stealth::StealthProfile;

use thiserror::Error;

/// Errors from the browser tier.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Chrome/Chromium not found. Install it or set CHROME_PATH")]
    ChromeNotFound,

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to prepare page: {0}")]
    Setup(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    #[error("Failed to read page content: {0}")]
    Content(String),

    #[error("Failed to close browser: {0}")]
    Close(String),

    #[error("Browser session already released")]
    Released,

    #[error("Browser support not compiled. Rebuild with: cargo build --features browser")]
    NotCompiled,
}
