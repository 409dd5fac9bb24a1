//! Watch loop for news feeds.
//!
//! Polls a fetcher on a fixed interval, drops records whose link was already
//! delivered, and hands the rest to a handler once per cycle.

mod error;
mod record;
mod seen;
mod watcher;

pub use error::{HandlerError, WatchError};
pub use record::{Fetcher, Handler, NewsRecord};
pub use seen::SeenSet;
pub use watcher::{CycleOutcome, WatchStats, Watcher, DEFAULT_POLL_INTERVAL};
