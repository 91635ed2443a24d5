//! Chrome sessions driven over CDP.

use async_trait::async_trait;

use super::config::BrowserEngineConfig;
use super::session::{BrowserSession, SessionLauncher};
use super::BrowserError;
use crate::scrapers::rotation::Identity;

#[cfg(feature = "browser")]
use std::path::PathBuf;
#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, info, warn};

/// Launches a fresh stealth Chrome process per session.
pub struct ChromeLauncher {
    #[cfg_attr(not(feature = "browser"), allow(dead_code))]
    config: BrowserEngineConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserEngineConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "browser")]
impl ChromeLauncher {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        // Common install locations
        "/opt/google/chrome/google-chrome",
    ];

    const CHROME_COMMANDS: &'static [&'static str] = &[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ];

    fn find_chrome(&self) -> Result<PathBuf, BrowserError> {
        if let Some(ref path) = self.config.chrome_path {
            if path.exists() {
                return Ok(path.clone());
            }
            warn!("Configured Chrome path {} does not exist", path.display());
        }

        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in Self::CHROME_COMMANDS {
            if let Ok(path) = which::which(cmd) {
                debug!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(BrowserError::ChromeNotFound)
    }

    /// Chrome flags for one session: stealth switches, the identity's user
    /// agent and proxy, then any configured extras.
    fn launch_args(&self, identity: &Identity) -> Vec<String> {
        let mut args: Vec<String> = [
            "--no-sandbox",
            "--disable-blink-features=AutomationControlled",
            "--disable-dev-shm-usage",
            "--disable-infobars",
            "--disable-extensions",
            "--start-maximized",
            "--no-first-run",
            "--no-default-browser-check",
        ]
        .iter()
        .map(|arg| arg.to_string())
        .collect();

        args.push(format!("--user-agent={}", identity.user_agent));
        if let Some(ref proxy) = identity.proxy {
            args.push(format!("--proxy-server={}", proxy));
        }
        args.extend(self.config.chrome_args.iter().cloned());
        args
    }

    fn browser_config(
        &self,
        identity: &Identity,
        profile_dir: &std::path::Path,
    ) -> Result<BrowserConfig, BrowserError> {
        let chrome_path = self.find_chrome()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(profile_dir)
            .window_size(1920, 1080)
            .request_timeout(Duration::from_secs(self.config.navigation_timeout));

        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }

        for arg in self.launch_args(identity) {
            builder = builder.arg(arg);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self, identity: &Identity) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let profile_dir =
            std::env::temp_dir().join(format!("jobscout-chrome-{}", uuid::Uuid::new_v4()));
        let config = self.browser_config(identity, &profile_dir)?;

        info!("Launching Chrome (headless={})", self.config.headless);
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let mut session = ChromeSession {
            browser: Some(browser),
            page: None,
            handler,
            profile_dir,
            nav_timeout: self.config.navigation_timeout,
        };

        if let Err(e) = session.open_page(identity, &self.config.stealth.scripts()).await {
            session.terminate();
            return Err(e);
        }

        Ok(Box::new(session))
    }
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self, _identity: &Identity) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Err(BrowserError::NotCompiled)
    }
}

#[cfg(feature = "browser")]
struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: JoinHandle<()>,
    profile_dir: PathBuf,
    nav_timeout: u64,
}

#[cfg(feature = "browser")]
impl ChromeSession {
    async fn open_page(&mut self, identity: &Identity, scripts: &[String]) -> Result<(), BrowserError> {
        let browser = self.browser.as_ref().ok_or(BrowserError::Released)?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Setup(e.to_string()))?;

        page.execute(SetUserAgentOverrideParams::new(identity.user_agent.clone()))
            .await
            .map_err(|e| BrowserError::Setup(e.to_string()))?;

        for script in scripts {
            page.execute(AddScriptToEvaluateOnNewDocumentParams::new(script.clone()))
                .await
                .map_err(|e| BrowserError::Setup(e.to_string()))?;
        }

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::Released)
    }

    fn remove_profile(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.profile_dir) {
            debug!(
                "Could not remove browser profile {}: {}",
                self.profile_dir.display(),
                e
            );
        }
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let page = self.page()?;
        info!("Navigating to {}", url);

        match tokio::time::timeout(Duration::from_secs(self.nav_timeout), page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                secs: self.nav_timeout,
            }),
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page()?
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                // Dropping the browser kills the child process
                drop(browser);
                self.handler.abort();
                self.remove_profile();
                return Err(BrowserError::Close(e.to_string()));
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed waiting for browser exit: {}", e);
            }
        }

        self.handler.abort();
        self.remove_profile();
        Ok(())
    }

    fn terminate(&mut self) {
        self.page = None;
        if self.browser.take().is_some() {
            debug!("Browser process killed");
        }
        self.handler.abort();
        self.remove_profile();
    }
}
