//! HTTP response wrapper.

use reqwest::{Response, StatusCode};

/// HTTP response wrapper.
pub struct HttpResponse {
    pub status: StatusCode,
    pub(crate) response: Response,
}

impl HttpResponse {
    pub(crate) fn from_response(response: Response) -> Self {
        Self {
            status: response.status(),
            response,
        }
    }

    /// Check for a plain 200 OK.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Get response body as text.
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.response.text().await
    }
}
