//! BlockBeats API payload types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::watch::NewsRecord;

/// A record type served by one BlockBeats endpoint.
pub trait Feed: NewsRecord + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Endpoint path relative to the API base URL.
    const PATH: &'static str;
    /// Human-readable feed name used in logs.
    const NAME: &'static str;
}

/// Flash news item (`open-flash`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashNews {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub pic: Option<String>,
    pub link: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(deserialize_with = "text_or_integer")]
    pub create_time: String,
    /// Fields not modelled above, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NewsRecord for FlashNews {
    fn link(&self) -> &str {
        &self.link
    }

    fn create_time(&self) -> &str {
        &self.create_time
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Feed for FlashNews {
    const PATH: &'static str = "open-flash";
    const NAME: &'static str = "flash_news";
}

/// Article (`open-information`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub link: String,
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(deserialize_with = "text_or_integer")]
    pub create_time: String,
    #[serde(default)]
    pub is_original: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NewsRecord for Article {
    fn link(&self) -> &str {
        &self.link
    }

    fn create_time(&self) -> &str {
        &self.create_time
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Feed for Article {
    const PATH: &'static str = "open-information";
    const NAME: &'static str = "articles";
}

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Application status, 0 on success.
    pub status: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Page<T>>,
}

/// One page of records.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub data: Vec<T>,
}

/// `create_time` arrives as a string on some endpoints and an integer on
/// others; keep it as text either way.
fn text_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
    })
}
