//! Watch loop tests.

mod printer_test;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blockbeats_watch::api::FetchError;
use blockbeats_watch::watch::{Fetcher, HandlerError, NewsRecord};
use tokio_util::sync::CancellationToken;

/// Minimal record used by the loop tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub link: String,
    pub create_time: String,
    pub title: String,
}

impl NewsRecord for Item {
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

pub fn item(link: &str, create_time: &str, title: &str) -> Item {
    Item {
        link: link.to_string(),
        create_time: create_time.to_string(),
        title: title.to_string(),
    }
}

/// Fetcher that replays a fixed script of results.
///
/// Once the script runs out it returns empty pages and, if configured,
/// cancels the token so `Watcher::run` returns.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<Vec<Item>, FetchError>>>,
    calls: Arc<AtomicUsize>,
    done: Option<CancellationToken>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<Vec<Item>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            done: None,
        }
    }

    pub fn cancel_when_done(mut self, token: CancellationToken) -> Self {
        self.done = Some(token);
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    type Record = Item;

    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self) -> Result<Vec<Item>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => {
                if let Some(ref token) = self.done {
                    token.cancel();
                }
                Ok(Vec::new())
            }
        }
    }
}

/// Titles of each batch a handler received, in call order.
pub type Batches = Arc<Mutex<Vec<Vec<String>>>>;

/// Handler that records every batch it receives.
pub fn recorder() -> (
    Batches,
    impl FnMut(&[Item]) -> Result<(), HandlerError>,
) {
    let batches: Batches = Arc::default();
    let sink = Arc::clone(&batches);
    let handler = move |records: &[Item]| -> Result<(), HandlerError> {
        sink.lock()
            .unwrap()
            .push(records.iter().map(|r| r.title.clone()).collect());
        Ok(())
    };
    (batches, handler)
}

pub fn offline() -> FetchError {
    FetchError::Other("connection refused".to_string())
}
