//! Contracts between the watch loop and its collaborators.

use async_trait::async_trait;

use crate::api::FetchError;

use super::error::HandlerError;

/// Minimum view of a news item the watch loop relies on.
pub trait NewsRecord {
    /// Unique key used for deduplication.
    fn link(&self) -> &str;
    /// Creation time as epoch seconds in text form.
    fn create_time(&self) -> &str;
    /// Display title.
    fn title(&self) -> &str;
}

/// Source of records polled by the watch loop.
///
/// Paging and language parameters are bound when the fetcher is built, so a
/// single call takes no arguments.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Record type produced by this fetcher.
    type Record: NewsRecord + Send;

    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Fetch one page of records, in the order the source returns them.
    async fn fetch(&self) -> Result<Vec<Self::Record>, FetchError>;
}

/// Consumer of newly discovered records.
///
/// Called at most once per poll cycle with a non-empty slice.
pub trait Handler<R> {
    /// Process a batch of new records.
    ///
    /// # Errors
    ///
    /// Any error stops the watch loop.
    fn handle(&mut self, records: &[R]) -> Result<(), HandlerError>;
}

impl<R, F> Handler<R> for F
where
    F: FnMut(&[R]) -> Result<(), HandlerError>,
{
    fn handle(&mut self, records: &[R]) -> Result<(), HandlerError> {
        self(records)
    }
}
