//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use jobscout::config::Settings;
use jobscout::scrapers::{BrowserError, BrowserSession, DelayRange, Identity, SessionLauncher};

/// Settings with every pause removed and short timeouts.
pub fn fast_settings(snapshots_dir: &Path) -> Settings {
    Settings {
        snapshots_dir: snapshots_dir.to_path_buf(),
        request_timeout: Duration::from_secs(5),
        metadata_timeout: Duration::from_secs(5),
        request_delay: DelayRange::none(),
        browser_delay: DelayRange::none(),
        settle_delay: Some(Duration::ZERO),
        extract_deadline: Some(Duration::from_secs(10)),
        ..Settings::default()
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub launched: AtomicUsize,
    pub navigated: AtomicUsize,
    pub closed: AtomicUsize,
    pub terminated: AtomicUsize,
    /// Proxy of every identity a session was launched with.
    pub proxies: Mutex<Vec<Option<String>>>,
}

impl Counters {
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn terminated(&self) -> usize {
        self.terminated.load(Ordering::SeqCst)
    }

    pub fn proxies(&self) -> Vec<Option<String>> {
        self.proxies.lock().unwrap().clone()
    }
}

/// How the fake browser behaves.
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    pub html: String,
    pub fail_launch: bool,
    pub fail_content: bool,
    pub navigate_delay: Option<Duration>,
}

/// Session launcher that records every lifecycle call.
pub struct MockLauncher {
    pub counters: Arc<Counters>,
    behavior: Behavior,
}

impl MockLauncher {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            behavior,
        }
    }

    pub fn serving(html: &str) -> Self {
        Self::new(Behavior {
            html: html.to_string(),
            ..Behavior::default()
        })
    }
}

#[async_trait]
impl SessionLauncher for MockLauncher {
    async fn launch(&self, identity: &Identity) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.counters.launched.fetch_add(1, Ordering::SeqCst);
        self.counters
            .proxies
            .lock()
            .unwrap()
            .push(identity.proxy.clone());
        if self.behavior.fail_launch {
            return Err(BrowserError::Launch("mock launch failure".to_string()));
        }
        Ok(Box::new(MockSession {
            counters: self.counters.clone(),
            behavior: self.behavior.clone(),
        }))
    }
}

struct MockSession {
    counters: Arc<Counters>,
    behavior: Behavior,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
        self.counters.navigated.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.behavior.navigate_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        if self.behavior.fail_content {
            return Err(BrowserError::Content("mock content failure".to_string()));
        }
        Ok(self.behavior.html.clone())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn terminate(&mut self) {
        self.counters.terminated.fetch_add(1, Ordering::SeqCst);
    }
}
