//! BlockBeats REST client.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::WatchConfig;
use crate::watch::Fetcher;

use super::error::FetchError;
use super::types::{ApiEnvelope, Article, Feed, FlashNews};

/// Public BlockBeats open API.
pub const DEFAULT_BASE_URL: &str = "https://api.theblockbeats.news/v1/open-api";

/// Connection timeout for HTTP requests.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout for HTTP requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client with timeout configuration.
fn build_http_client(
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<Client, FetchError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Request(format!("Failed to build HTTP client: {e}")))
}

/// Paging and language parameters for a feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Records per page.
    pub size: u32,
    /// 1-based page number.
    pub page: u32,
    /// Content language code (`en`, `zh`, ...).
    pub lang: String,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            size: 10,
            page: 1,
            lang: "en".to_string(),
        }
    }
}

/// Client for the BlockBeats open API.
#[derive(Debug, Clone)]
pub struct BlockBeatsClient {
    client: Client,
    base_url: String,
}

impl BlockBeatsClient {
    /// Create a client for the public API with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            DEFAULT_CONNECT_TIMEOUT,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }

    /// Create a client for a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` does not parse, or
    /// `FetchError::Request` if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, FetchError> {
        Url::parse(base_url)?;
        Ok(Self {
            client: build_http_client(connect_timeout, request_timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// See [`with_base_url`](Self::with_base_url).
    pub fn from_config(config: &WatchConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.base_url,
            config.connect_timeout(),
            config.request_timeout(),
        )
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for an endpoint path.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the joined URL does not parse.
    pub fn request_url(&self, path: &str, query: &FeedQuery) -> Result<Url, FetchError> {
        let endpoint = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("size", query.size.to_string()),
                ("page", query.page.to_string()),
                ("lang", query.lang.clone()),
            ],
        )?;
        Ok(url)
    }

    /// Fetch one page of a feed.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` on transport failure, a non-200 status, a
    /// non-zero API status or an undecodable body.
    pub async fn fetch<R: Feed>(&self, query: &FeedQuery) -> Result<Vec<R>, FetchError> {
        let url = self.request_url(R::PATH, query)?;
        tracing::debug!(feed = R::NAME, url = %url, "Fetching feed page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                path: R::PATH.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let records = parse_envelope(R::PATH, &body)?;
        tracing::trace!(feed = R::NAME, count = records.len(), "Fetched feed page");
        Ok(records)
    }

    /// Fetch one page of flash news.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn fetch_flash_news(
        &self,
        query: &FeedQuery,
    ) -> Result<Vec<FlashNews>, FetchError> {
        self.fetch(query).await
    }

    /// Fetch one page of articles.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn fetch_articles(
        &self,
        query: &FeedQuery,
    ) -> Result<Vec<Article>, FetchError> {
        self.fetch(query).await
    }
}

/// Decode a response body and unwrap its record list.
///
/// # Errors
///
/// Returns `FetchError::Parse` if the body is not a valid envelope or lacks
/// a data page, and `FetchError::Api` if the envelope status is non-zero.
pub fn parse_envelope<T: DeserializeOwned>(path: &str, body: &str) -> Result<Vec<T>, FetchError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| FetchError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    if envelope.status != 0 {
        return Err(FetchError::Api {
            path: path.to_string(),
            message: envelope.message,
        });
    }

    envelope
        .data
        .map(|page| page.data)
        .ok_or_else(|| FetchError::Parse {
            path: path.to_string(),
            message: "missing data page".to_string(),
        })
}

/// [`Fetcher`] for one BlockBeats feed with fixed paging parameters.
pub struct FeedFetcher<R> {
    client: BlockBeatsClient,
    query: FeedQuery,
    _record: PhantomData<fn() -> R>,
}

impl<R: Feed> FeedFetcher<R> {
    /// Create a fetcher for feed `R`.
    #[must_use]
    pub fn new(client: BlockBeatsClient, query: FeedQuery) -> Self {
        Self {
            client,
            query,
            _record: PhantomData,
        }
    }

    /// Get the request parameters.
    #[must_use]
    pub fn query(&self) -> &FeedQuery {
        &self.query
    }
}

#[async_trait]
impl<R: Feed> Fetcher for FeedFetcher<R> {
    type Record = R;

    fn name(&self) -> &str {
        R::NAME
    }

    async fn fetch(&self) -> Result<Vec<R>, FetchError> {
        self.client.fetch(&self.query).await
    }
}
