use reqwest::StatusCode;

/// Errors surfaced by [`ApiClient`] calls.
///
/// Every session-gated endpoint rejects a missing, expired, or
/// account-less credential with a 401, which shows up here as
/// [`ApiError::HttpStatus`] carrying the server's error body.
///
/// [`ApiClient`]: super::ApiClient
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("server rejected request with status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    /// True when the server rejected the held session credential; the
    /// caller should re-authenticate and retry.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::HttpStatus(StatusCode::UNAUTHORIZED, _))
    }
}
