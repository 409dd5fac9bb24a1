//! Polling loop that delivers newly seen records to a handler.

use std::collections::HashSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::error::WatchError;
use super::record::{Fetcher, Handler, NewsRecord};
use super::seen::SeenSet;

/// Default delay between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The fetcher failed; nothing was recorded or delivered.
    FetchFailed,
    /// The fetch succeeded but every record was already seen.
    NoNewRecords,
    /// The handler received this many new records.
    Delivered(usize),
}

/// Counters accumulated over the lifetime of a watcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Poll cycles attempted.
    pub cycles: u64,
    /// Cycles whose fetch failed.
    pub fetch_failures: u64,
    /// Records handed to the handler.
    pub delivered: u64,
}

/// Polls a [`Fetcher`] on a fixed interval and hands unseen records to a
/// [`Handler`].
///
/// Records are deduplicated by link for the lifetime of the watcher. Within
/// one cycle, new records are delivered in the reverse of fetch order: the
/// source lists newest first, so the handler sees oldest first.
///
/// Fetch failures are logged and skipped. Handler failures stop the loop.
/// The loop puts no timeout on the fetcher, so a fetch that never completes
/// stalls it.
pub struct Watcher<F, H> {
    fetcher: F,
    handler: H,
    interval: Duration,
    seen: SeenSet,
    stats: WatchStats,
    cancel: Option<CancellationToken>,
}

impl<F, H> Watcher<F, H>
where
    F: Fetcher,
    H: Handler<F::Record>,
{
    /// Create a watcher with the default poll interval and an unbounded
    /// seen-set.
    #[must_use]
    pub fn new(fetcher: F, handler: H) -> Self {
        Self {
            fetcher,
            handler,
            interval: DEFAULT_POLL_INTERVAL,
            seen: SeenSet::new(),
            stats: WatchStats::default(),
            cancel: None,
        }
    }

    /// Set the delay between poll cycles.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bound the seen-set to `capacity` links, evicting the oldest first.
    ///
    /// A capacity below the fetcher's page size evicts links the source is
    /// still returning, which are then delivered again on the next cycle.
    #[must_use]
    pub fn with_seen_capacity(mut self, capacity: usize) -> Self {
        self.seen = SeenSet::bounded(capacity);
        self
    }

    /// Set a cancellation token checked while waiting between cycles.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Delay between poll cycles.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Links delivered so far.
    #[must_use]
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Counters for this watcher.
    #[must_use]
    pub fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Get the handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Run one fetch, dedup and dispatch step without waiting first.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Handler` if the handler fails. Fetch errors are
    /// logged and reported as [`CycleOutcome::FetchFailed`].
    pub async fn poll_once(&mut self) -> Result<CycleOutcome, WatchError> {
        self.stats.cycles += 1;

        let records = match self.fetcher.fetch().await {
            Ok(records) => records,
            Err(e) => {
                self.stats.fetch_failures += 1;
                tracing::error!(
                    fetcher = %self.fetcher.name(),
                    error = %e,
                    "Error fetching records"
                );
                return Ok(CycleOutcome::FetchFailed);
            }
        };

        let fetched = records.len();
        let fresh = self.take_unseen(records);
        tracing::debug!(
            fetcher = %self.fetcher.name(),
            fetched,
            new = fresh.len(),
            seen = self.seen.len(),
            "Poll cycle complete"
        );

        if fresh.is_empty() {
            return Ok(CycleOutcome::NoNewRecords);
        }

        let count = fresh.len();
        self.handler.handle(&fresh)?;
        self.stats.delivered += count as u64;
        Ok(CycleOutcome::Delivered(count))
    }

    /// Poll forever: wait one interval, then [`poll_once`](Self::poll_once).
    ///
    /// Without a cancellation token this only returns on handler failure.
    /// With one, it returns `Ok(())` when the token is cancelled while
    /// waiting; an in-flight fetch or handler call is never interrupted.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Handler` if the handler fails.
    pub async fn run(&mut self) -> Result<(), WatchError> {
        tracing::info!(
            fetcher = %self.fetcher.name(),
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "Watching for new records"
        );

        loop {
            if let Some(cancel) = self.cancel.clone() {
                tokio::select! {
                    biased;

                    () = cancel.cancelled() => {
                        tracing::info!(
                            fetcher = %self.fetcher.name(),
                            cycles = self.stats.cycles,
                            delivered = self.stats.delivered,
                            "Watch cancelled"
                        );
                        return Ok(());
                    }
                    () = tokio::time::sleep(self.interval) => {}
                }
            } else {
                tokio::time::sleep(self.interval).await;
            }

            self.poll_once().await?;
        }
    }

    /// Record unseen links and return their records, oldest first.
    ///
    /// Only the first occurrence of a link within `records` is kept, even if
    /// a bounded seen-set evicts it before the batch is done.
    fn take_unseen(&mut self, records: Vec<F::Record>) -> Vec<F::Record> {
        let mut batch = HashSet::with_capacity(records.len());
        let mut fresh: Vec<F::Record> = records
            .into_iter()
            .filter(|r| {
                batch.insert(r.link().to_string()) && self.seen.insert(r.link(), r.create_time())
            })
            .collect();
        fresh.reverse();
        fresh
    }
}
