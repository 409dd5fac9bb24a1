//! Watch loop error types.

/// Errors raised by a [`Handler`](super::Handler).
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    /// A record's `create_time` is not a valid epoch-seconds value.
    #[error("Invalid create_time {value:?} for {link}")]
    InvalidTimestamp { link: String, value: String },

    /// Writing handler output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other handler-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Errors that stop a running watch loop.
///
/// Fetch failures never show up here; the loop logs them and keeps polling.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    /// The handler failed while processing new records.
    #[error("Handler failed: {0}")]
    Handler(#[from] HandlerError),
}
