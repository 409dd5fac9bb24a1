//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{FeedQuery, DEFAULT_BASE_URL};

/// Which BlockBeats feed to poll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Flash news (`open-flash`).
    Flash,
    /// Articles (`open-information`).
    #[default]
    Articles,
}

/// Configuration for a watch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Feed to poll.
    pub source: FeedSource,
    /// Seconds to wait before each poll.
    pub interval_secs: u64,
    /// Records per page.
    pub size: u32,
    /// Page to request.
    pub page: u32,
    /// Content language.
    pub lang: String,
    /// API base URL.
    pub base_url: String,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum links remembered for dedup. Unset means unbounded. Values
    /// below `size` are raised to `size`.
    pub max_seen: Option<usize>,
    /// Print records with unparseable timestamps instead of stopping.
    pub lenient_timestamps: bool,
    /// Colour printer output when stdout is a terminal.
    pub color: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::default(),
            interval_secs: 10,
            size: 10,
            page: 1,
            lang: "en".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_seen: None,
            lenient_timestamps: false,
            color: true,
        }
    }
}

impl WatchConfig {
    /// Delay between poll cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// HTTP connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// HTTP request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Request parameters for the configured feed.
    #[must_use]
    pub fn query(&self) -> FeedQuery {
        FeedQuery {
            size: self.size,
            page: self.page,
            lang: self.lang.clone(),
        }
    }

    /// Seen-set capacity, never smaller than one page of records.
    #[must_use]
    pub fn seen_capacity(&self) -> Option<usize> {
        let page = usize::try_from(self.size).unwrap_or(usize::MAX);
        self.max_seen.map(|max| max.max(page))
    }
}
