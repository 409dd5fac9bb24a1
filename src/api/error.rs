//! Fetch error types.

/// Errors from fetching a page of records.
///
/// The watch loop treats every variant the same way: log and poll again at
/// the next interval.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("Request failed: {0}")]
    Request(String),

    /// The HTTP client gave up waiting.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-200 status.
    #[error("Failed to fetch {path}: {status} {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// The API envelope reported a non-zero status code.
    #[error("Failed to fetch {path}: {message}")]
    Api { path: String, message: String },

    /// The response body did not match the expected envelope.
    #[error("Failed to parse {path} response: {message}")]
    Parse { path: String, message: String },

    /// The request URL could not be built from the configured base URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Failure from a fetcher that is not the HTTP client.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(e.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}
