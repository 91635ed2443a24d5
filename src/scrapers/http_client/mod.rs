//! HTTP client that presents itself as a desktop browser navigation.

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{DEFAULT_USER_AGENTS, METADATA_USER_AGENT};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::{Client, Proxy, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use super::rotation::Identity;

/// Errors from the HTTP tier.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid proxy {proxy}: {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(StatusCode),
}

/// Headers a browser sends on a top-level navigation.
fn navigation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

/// HTTP client bound to one identity.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client that sends `identity`'s user agent and routes through
    /// its proxy, if any.
    pub fn for_identity(identity: &Identity, timeout: Duration) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(&identity.user_agent)
            .default_headers(navigation_headers())
            .timeout(timeout)
            .gzip(true)
            .brotli(true);

        if let Some(ref proxy) = identity.proxy {
            info!("Using proxy for requests: {}", proxy);
            let proxy_cfg = Proxy::all(proxy).map_err(|source| FetchError::Proxy {
                proxy: proxy.clone(),
                source,
            })?;
            builder = builder.proxy(proxy_cfg);
        }

        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// GET `url`, following redirects. Any status is returned as-is.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Ok(HttpResponse::from_response(response))
    }

    /// GET `url` and return the body of a 200 response.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        if !response.is_ok() {
            return Err(FetchError::Status(response.status));
        }
        Ok(response.text().await?)
    }
}
