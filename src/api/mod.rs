//! BlockBeats open API client.
//!
//! Fetches flash news and articles and adapts them to the watch loop's
//! [`Fetcher`](crate::watch::Fetcher) contract.

mod client;
mod error;
mod types;

pub use client::*;
pub use error::FetchError;
pub use types::{ApiEnvelope, Article, Feed, FlashNews, Page};
