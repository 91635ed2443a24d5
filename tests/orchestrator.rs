//! Two-tier scrape behaviour against a local HTTP server and a fake browser.

mod common;

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{fast_settings, Behavior, MockLauncher};
use jobscout::models::{
    ExtractionMethod, SourceSite, FAILURE_MARKER, NO_DESCRIPTION, UNKNOWN_COMPANY,
    UNKNOWN_POSITION,
};
use jobscout::storage::FsSnapshotStore;
use jobscout::JobScraper;

const STATIC_POSTING: &str = r#"<html><head><title>Ignored</title></head><body>
<h1 class="job-title">Platform Engineer</h1>
<span class="company-name">Vandelay Industries</span>
<div class="job-description">Import and export.</div>
</body></html>"#;

const RENDERED_POSTING: &str =
    "<html><head><title>Tab title</title></head><body><h1>Rendered Title</h1></body></html>";

async fn serve(status: u16, body: &str) -> (MockServer, String) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    let url = format!("{}/job", server.uri());
    (server, url)
}

fn scraper(
    settings: &jobscout::Settings,
    launcher: MockLauncher,
) -> (JobScraper, Arc<common::Counters>) {
    let counters = launcher.counters.clone();
    let snapshots = Arc::new(FsSnapshotStore::new(settings.snapshots_dir.clone()));
    (
        JobScraper::with_parts(settings, Arc::new(launcher), snapshots),
        counters,
    )
}

#[tokio::test]
async fn lightweight_success_skips_browser() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(200, STATIC_POSTING).await;
    let (scraper, counters) = scraper(&fast_settings(dir.path()), MockLauncher::serving(""));

    let result = scraper.extract(&url).await;

    assert_eq!(result.extraction_method, Some(ExtractionMethod::Lightweight));
    assert_eq!(result.job_title, "Platform Engineer");
    assert_eq!(result.company_name, "Vandelay Industries");
    assert_eq!(result.job_description, "Import and export.");
    assert_eq!(result.source_site, SourceSite::Unknown);
    assert!(result.is_scraped_successfully());
    assert_eq!(counters.launched(), 0);

    let snapshot = result.snapshot.expect("snapshot saved");
    assert_eq!(std::fs::read_to_string(snapshot).unwrap(), STATIC_POSTING);
}

#[tokio::test]
async fn lightweight_fetch_uses_pool_user_agent() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATIC_POSTING))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = fast_settings(dir.path());
    settings.user_agents = vec!["TestAgent/1.0".to_string()];
    let (scraper, counters) = scraper(&settings, MockLauncher::serving(""));

    let result = scraper.extract(&format!("{}/job", server.uri())).await;

    assert_eq!(result.extraction_method, Some(ExtractionMethod::Lightweight));
    assert_eq!(counters.launched(), 0);
}

#[tokio::test]
async fn lightweight_fetch_routes_through_proxy() {
    let dir = tempfile::tempdir().unwrap();
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATIC_POSTING))
        .expect(1)
        .mount(&proxy)
        .await;

    let mut settings = fast_settings(dir.path());
    settings.proxies = vec![proxy.uri()];
    let (scraper, counters) = scraper(&settings, MockLauncher::serving(""));

    let result = scraper.extract("http://job-board.invalid/job").await;

    assert_eq!(result.extraction_method, Some(ExtractionMethod::Lightweight));
    assert_eq!(result.job_title, "Platform Engineer");
    assert_eq!(counters.launched(), 0);
}

#[tokio::test]
async fn browser_session_takes_next_proxy() {
    let dir = tempfile::tempdir().unwrap();
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&proxy)
        .await;

    let mut settings = fast_settings(dir.path());
    settings.proxies = vec![proxy.uri(), "socks5://127.0.0.1:1080".to_string()];
    let (scraper, counters) = scraper(&settings, MockLauncher::serving(RENDERED_POSTING));

    let result = scraper.extract("http://job-board.invalid/job").await;

    assert_eq!(result.extraction_method, Some(ExtractionMethod::Browser));
    assert_eq!(
        counters.proxies(),
        vec![Some("socks5://127.0.0.1:1080".to_string())]
    );
}

#[tokio::test]
async fn server_error_escalates_to_one_browser_session() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(500, "oops").await;
    let (scraper, counters) = scraper(
        &fast_settings(dir.path()),
        MockLauncher::serving(RENDERED_POSTING),
    );

    let result = scraper.extract(&url).await;

    assert_eq!(counters.launched(), 1);
    assert_eq!(counters.closed(), 1);
    assert_eq!(counters.terminated(), 0);
    assert_eq!(result.extraction_method, Some(ExtractionMethod::Browser));
    assert_eq!(result.job_title, "Rendered Title");
    assert_eq!(result.company_name, UNKNOWN_COMPANY);
    assert_eq!(result.job_description, NO_DESCRIPTION);
    assert!(!result.is_scraped_successfully());

    let snapshot = result.snapshot.expect("snapshot saved");
    assert_eq!(std::fs::read_to_string(snapshot).unwrap(), RENDERED_POSTING);
}

#[tokio::test]
async fn page_without_title_or_company_escalates() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(200, "<html><body><p>Enable JavaScript</p></body></html>").await;
    let (scraper, counters) = scraper(
        &fast_settings(dir.path()),
        MockLauncher::serving(RENDERED_POSTING),
    );

    let result = scraper.extract(&url).await;

    assert_eq!(counters.launched(), 1);
    assert_eq!(counters.closed(), 1);
    assert_eq!(result.extraction_method, Some(ExtractionMethod::Browser));
}

#[tokio::test]
async fn content_failure_still_releases_session() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(503, "").await;
    let launcher = MockLauncher::new(Behavior {
        fail_content: true,
        ..Behavior::default()
    });
    let (scraper, counters) = scraper(&fast_settings(dir.path()), launcher);

    let result = scraper.extract(&url).await;

    assert_eq!(counters.launched(), 1);
    assert_eq!(counters.closed(), 1);
    assert_eq!(counters.terminated(), 0);
    assert_eq!(result.company_name, UNKNOWN_COMPANY);
    assert_eq!(result.job_title, UNKNOWN_POSITION);
    assert!(result.job_description.starts_with(FAILURE_MARKER));
    assert!(result.job_description.contains("mock content failure"));
    assert_eq!(result.extraction_method, None);
    assert!(result.snapshot.is_none());
    assert!(!result.is_scraped_successfully());
}

#[tokio::test]
async fn launch_failure_yields_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(404, "").await;
    let launcher = MockLauncher::new(Behavior {
        fail_launch: true,
        ..Behavior::default()
    });
    let (scraper, counters) = scraper(&fast_settings(dir.path()), launcher);

    let result = scraper.extract(&url).await;

    assert_eq!(counters.launched(), 1);
    assert_eq!(counters.closed(), 0);
    assert!(result.job_description.contains("mock launch failure"));
    assert_eq!(result.source_site, SourceSite::Unknown);
    assert!(result.snapshot.is_none());
}

#[tokio::test]
async fn deadline_terminates_browser() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(500, "").await;
    let launcher = MockLauncher::new(Behavior {
        navigate_delay: Some(Duration::from_secs(30)),
        ..Behavior::default()
    });
    let mut settings = fast_settings(dir.path());
    settings.extract_deadline = Some(Duration::from_millis(500));
    let (scraper, counters) = scraper(&settings, launcher);

    let result = scraper.extract(&url).await;

    assert_eq!(counters.launched(), 1);
    assert_eq!(counters.closed(), 0);
    assert_eq!(counters.terminated(), 1);
    assert!(result.job_description.starts_with(FAILURE_MARKER));
    assert!(result.job_description.contains("deadline"));
}

#[tokio::test]
async fn unwritable_snapshot_dir_escalates_and_still_returns() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let (_server, url) = serve(200, STATIC_POSTING).await;
    let (scraper, counters) = scraper(
        &fast_settings(&blocker),
        MockLauncher::serving(RENDERED_POSTING),
    );

    let result = scraper.extract(&url).await;

    // Tier 1 parsed fine but could not persist, so Tier 2 ran
    assert_eq!(counters.launched(), 1);
    assert_eq!(result.extraction_method, Some(ExtractionMethod::Browser));
    assert_eq!(result.job_title, "Rendered Title");
    assert!(result.snapshot.is_none());
}

#[tokio::test]
async fn each_call_gets_its_own_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(200, STATIC_POSTING).await;
    let (scraper, _counters) = scraper(&fast_settings(dir.path()), MockLauncher::serving(""));

    let first = scraper.extract(&url).await.snapshot.unwrap();
    let second = scraper.extract(&url).await.snapshot.unwrap();

    assert_ne!(first, second);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn title_and_company_are_never_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, url) = serve(500, "").await;

    for behavior in [
        Behavior::default(),
        Behavior {
            fail_launch: true,
            ..Behavior::default()
        },
        Behavior {
            fail_content: true,
            ..Behavior::default()
        },
    ] {
        let (scraper, _) = scraper(&fast_settings(dir.path()), MockLauncher::new(behavior));
        let result = scraper.extract(&url).await;
        assert!(!result.job_title.is_empty());
        assert!(!result.company_name.is_empty());
        assert!(!result.job_description.is_empty());
    }
}
