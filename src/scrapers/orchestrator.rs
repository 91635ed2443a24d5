//! Two-tier scrape: plain HTTP first, a stealth browser session second.

use std::sync::Arc;
use std::time::Duration;

use scraper::Html;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::browser::{BrowserError, ChromeLauncher, SessionGuard, SessionLauncher, SessionManager};
use super::lightweight::LightweightFetcher;
use super::sites::{Site, SiteExtractor};
use super::DelayRange;
use crate::config::Settings;
use crate::models::{ExtractionMethod, ExtractionResult, RawJobFields, SourceSite};
use crate::storage::{FsSnapshotStore, SnapshotStore};

/// Scrapes job postings.
///
/// One instance can serve many concurrent calls; the identity rotation
/// counters are the only state they share. Every call gets its own snapshot
/// id and, if needed, its own browser process.
pub struct JobScraper {
    lightweight: LightweightFetcher,
    sessions: SessionManager,
    snapshots: Arc<dyn SnapshotStore>,
    browser_delay: DelayRange,
    settle_delay: Option<Duration>,
    deadline: Option<Duration>,
}

impl JobScraper {
    /// Scraper backed by local Chrome and the configured snapshot directory.
    pub fn new(settings: &Settings) -> Self {
        Self::with_parts(
            settings,
            Arc::new(ChromeLauncher::new(settings.browser.clone())),
            Arc::new(FsSnapshotStore::new(settings.snapshots_dir.clone())),
        )
    }

    /// Scraper with an explicit browser launcher and snapshot store.
    pub fn with_parts(
        settings: &Settings,
        launcher: Arc<dyn SessionLauncher>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let pool = Arc::new(settings.identity_pool());
        Self {
            lightweight: LightweightFetcher::new(
                pool.clone(),
                settings.request_timeout,
                settings.request_delay,
            ),
            sessions: SessionManager::new(launcher, pool),
            snapshots,
            browser_delay: settings.browser_delay,
            settle_delay: settings.settle_delay,
            deadline: settings.extract_deadline,
        }
    }

    /// Scrape `url`. Never fails: problems end up in the returned result's
    /// description with placeholder company and title.
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        let source_site = SourceSite::from_url(url);
        let snapshot_id = Uuid::new_v4().to_string();

        info!("Starting to scrape job from {}: {}", source_site, url);

        let work = self.run_tiers(url, source_site, &snapshot_id);
        match self.deadline {
            Some(limit) => match tokio::time::timeout(limit, work).await {
                Ok(result) => result,
                Err(_) => {
                    error!(
                        "Scrape of {} exceeded {}s deadline, abandoning",
                        url,
                        limit.as_secs()
                    );
                    ExtractionResult::failure(
                        source_site,
                        format!("extraction exceeded {}s deadline", limit.as_secs()),
                    )
                }
            },
            None => work.await,
        }
    }

    async fn run_tiers(
        &self,
        url: &str,
        source_site: SourceSite,
        snapshot_id: &str,
    ) -> ExtractionResult {
        if let Some(result) = self.try_lightweight(url, source_site, snapshot_id).await {
            return result;
        }

        info!("Lightweight fetch failed, falling back to browser session");
        self.try_browser(url, source_site, snapshot_id).await
    }

    /// `None` means escalate.
    async fn try_lightweight(
        &self,
        url: &str,
        source_site: SourceSite,
        snapshot_id: &str,
    ) -> Option<ExtractionResult> {
        let page = match self.lightweight.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Lightweight fetch failed: {}", e);
                return None;
            }
        };

        if !page.is_useful() {
            info!("Lightweight fetch found neither title nor company");
            return None;
        }

        match self.snapshots.save(&page.html, snapshot_id) {
            Ok(path) => {
                let fields = page.fields.resolve();
                info!(
                    "Scraped with lightweight fetch: {} at {}",
                    fields.job_title, fields.company_name
                );
                Some(ExtractionResult::new(
                    fields,
                    source_site,
                    ExtractionMethod::Lightweight,
                    Some(path),
                ))
            }
            Err(e) => {
                error!("Failed to save HTML from lightweight fetch: {}", e);
                None
            }
        }
    }

    async fn try_browser(
        &self,
        url: &str,
        source_site: SourceSite,
        snapshot_id: &str,
    ) -> ExtractionResult {
        let mut guard = match self.sessions.acquire().await {
            Ok(guard) => guard,
            Err(e) => {
                error!("Error scraping job from {}: {}", url, e);
                return ExtractionResult::failure(source_site, e);
            }
        };

        let outcome = self.browse(&mut guard, url, source_site).await;

        if let Err(e) = guard.release().await {
            warn!("Failed to release browser session: {}", e);
        }

        match outcome {
            Ok((fields, html)) => {
                let snapshot = match self.snapshots.save(&html, snapshot_id) {
                    Ok(path) => {
                        info!("HTML snapshot saved: {}", path.display());
                        Some(path)
                    }
                    Err(e) => {
                        error!("Failed to save HTML snapshot: {}", e);
                        None
                    }
                };

                let fields = fields.resolve();
                info!(
                    "Scraped with browser session: {} at {}",
                    fields.job_title, fields.company_name
                );
                ExtractionResult::new(fields, source_site, ExtractionMethod::Browser, snapshot)
            }
            Err(e) => {
                error!("Error scraping job from {}: {}", url, e);
                ExtractionResult::failure(source_site, e)
            }
        }
    }

    async fn browse(
        &self,
        guard: &mut SessionGuard,
        url: &str,
        source_site: SourceSite,
    ) -> Result<(RawJobFields, String), BrowserError> {
        self.browser_delay.wait().await;

        let extractor = Site::for_source(source_site).extractor();
        if extractor.site() == Site::Generic {
            warn!(
                "Unknown source site for {}, attempting generic scraping",
                url
            );
        }

        guard.navigate(url).await?;
        tokio::time::sleep(self.settle_delay.unwrap_or_else(|| extractor.settle_delay())).await;

        let html = guard.content().await?;
        let fields = extract_from_html(extractor, &html);
        Ok((fields, html))
    }
}

fn extract_from_html(extractor: &dyn SiteExtractor, html: &str) -> RawJobFields {
    let document = Html::parse_document(html);
    extractor.extract(&document)
}
