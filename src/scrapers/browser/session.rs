//! Browser session lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::BrowserError;
use crate::scrapers::rotation::{Identity, IdentityPool};

/// One live browser process with a single page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` in the session's page.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Serialized DOM of the current page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Close the page and shut the browser down gracefully.
    async fn close(&mut self) -> Result<(), BrowserError>;

    /// Kill the browser without waiting. Must be safe to call after `close`.
    fn terminate(&mut self);
}

/// Starts browser sessions.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self, identity: &Identity) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// Hands out guarded sessions, each with a fresh identity from the pool.
#[derive(Clone)]
pub struct SessionManager {
    launcher: Arc<dyn SessionLauncher>,
    pool: Arc<IdentityPool>,
}

impl SessionManager {
    pub fn new(launcher: Arc<dyn SessionLauncher>, pool: Arc<IdentityPool>) -> Self {
        Self { launcher, pool }
    }

    /// Launch a session. The browser is released when the guard is.
    pub async fn acquire(&self) -> Result<SessionGuard, BrowserError> {
        let identity = self.pool.next_identity();
        info!(
            "Launching browser session (proxy: {})",
            identity.proxy.as_deref().unwrap_or("none")
        );
        debug!("Browser user agent: {}", identity.user_agent);

        let session = self.launcher.launch(&identity).await?;
        Ok(SessionGuard {
            session: Some(session),
            identity,
        })
    }
}

/// Scoped ownership of a browser session.
///
/// Call [`SessionGuard::release`] on every normal path. If the guard is
/// dropped instead (an early return, a cancelled future) the browser is
/// terminated on the spot.
pub struct SessionGuard {
    session: Option<Box<dyn BrowserSession>>,
    identity: Identity,
}

impl SessionGuard {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn session(&mut self) -> Result<&mut Box<dyn BrowserSession>, BrowserError> {
        self.session.as_mut().ok_or(BrowserError::Released)
    }

    pub async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.session()?.navigate(url).await
    }

    pub async fn content(&mut self) -> Result<String, BrowserError> {
        self.session()?.content().await
    }

    /// Close the session. Runs at most once per guard; a failed close still
    /// kills the process.
    pub async fn release(mut self) -> Result<(), BrowserError> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        match session.close().await {
            Ok(()) => {
                debug!("Browser session released");
                Ok(())
            }
            Err(e) => {
                session.terminate();
                Err(e)
            }
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            warn!("Browser session dropped without release, terminating browser");
            session.terminate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::rotation::RotationStrategyType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        closed: AtomicUsize,
        terminated: AtomicUsize,
    }

    struct FakeSession {
        counters: Arc<Counters>,
        fail_close: bool,
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn content(&mut self) -> Result<String, BrowserError> {
            Ok("<html></html>".to_string())
        }

        async fn close(&mut self) -> Result<(), BrowserError> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err(BrowserError::Close("boom".to_string()))
            } else {
                Ok(())
            }
        }

        fn terminate(&mut self) {
            self.counters.terminated.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeLauncher {
        counters: Arc<Counters>,
        fail_close: bool,
    }

    #[async_trait]
    impl SessionLauncher for FakeLauncher {
        async fn launch(
            &self,
            _identity: &Identity,
        ) -> Result<Box<dyn BrowserSession>, BrowserError> {
            Ok(Box::new(FakeSession {
                counters: self.counters.clone(),
                fail_close: self.fail_close,
            }))
        }
    }

    fn manager(counters: &Arc<Counters>, fail_close: bool) -> SessionManager {
        let pool = IdentityPool::new(
            vec!["UA-1".to_string()],
            vec!["http://proxy:1".to_string()],
            RotationStrategyType::RoundRobin,
        );
        SessionManager::new(
            Arc::new(FakeLauncher {
                counters: counters.clone(),
                fail_close,
            }),
            Arc::new(pool),
        )
    }

    #[tokio::test]
    async fn release_closes_once_without_terminating() {
        let counters = Arc::new(Counters::default());
        let guard = manager(&counters, false).acquire().await.unwrap();
        assert_eq!(guard.identity().user_agent, "UA-1");
        assert_eq!(guard.identity().proxy.as_deref(), Some("http://proxy:1"));

        guard.release().await.unwrap();

        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_close_terminates() {
        let counters = Arc::new(Counters::default());
        let guard = manager(&counters, true).acquire().await.unwrap();

        assert!(guard.release().await.is_err());

        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropped_guard_terminates() {
        let counters = Arc::new(Counters::default());
        {
            let mut guard = manager(&counters, false).acquire().await.unwrap();
            guard.navigate("https://example.com").await.unwrap();
        }

        assert_eq!(counters.closed.load(Ordering::SeqCst), 0);
        assert_eq!(counters.terminated.load(Ordering::SeqCst), 1);
    }
}
