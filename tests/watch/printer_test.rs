//! The default printer driven by the watch loop.

use std::time::Duration;

use blockbeats_watch::display::Printer;
use blockbeats_watch::watch::{CycleOutcome, HandlerError, WatchError, Watcher};
use tokio_util::sync::CancellationToken;

use super::{item, ScriptedFetcher};

fn printed(watcher_output: &[u8]) -> Vec<&str> {
    std::str::from_utf8(watcher_output).unwrap().lines().collect()
}

#[tokio::test]
async fn prints_new_records_oldest_first() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![item("b", "200", "B"), item("a", "100", "A")]),
        Ok(vec![item("b", "200", "B"), item("c", "1700000000", "C")]),
    ]);
    let mut watcher = Watcher::new(fetcher, Printer::new(Vec::<u8>::new()));

    watcher.poll_once().await.unwrap();
    watcher.poll_once().await.unwrap();

    assert_eq!(
        printed(watcher.handler().get_ref()),
        vec![
            "A - 1970-01-01 00:01:40",
            "B - 1970-01-01 00:03:20",
            "C - 2023-11-14 22:13:20",
        ]
    );
}

#[tokio::test]
async fn malformed_timestamp_stops_the_loop() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![item("a", "100", "A")]),
        Ok(vec![item("b", "not-a-number", "B")]),
        Ok(vec![item("c", "300", "C")]),
    ]);
    let mut watcher = Watcher::new(fetcher, Printer::new(Vec::<u8>::new()))
        .with_interval(Duration::from_millis(1));

    let result = tokio::time::timeout(Duration::from_secs(5), watcher.run())
        .await
        .expect("watch loop did not stop");

    match result {
        Err(WatchError::Handler(HandlerError::InvalidTimestamp { link, value })) => {
            assert_eq!(link, "b");
            assert_eq!(value, "not-a-number");
        }
        other => panic!("Expected InvalidTimestamp, got {other:?}"),
    }
    assert_eq!(
        printed(watcher.handler().get_ref()),
        vec!["A - 1970-01-01 00:01:40"]
    );
    assert_eq!(watcher.stats().cycles, 2);
}

#[tokio::test]
async fn lenient_printer_keeps_the_loop_running() {
    let done = CancellationToken::new();
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![item("b", "not-a-number", "B")]),
        Ok(vec![item("c", "300", "C")]),
    ])
    .cancel_when_done(done.clone());
    let printer = Printer::new(Vec::<u8>::new()).lenient(true);
    let mut watcher = Watcher::new(fetcher, printer)
        .with_interval(Duration::from_millis(1))
        .with_cancellation(done);

    tokio::time::timeout(Duration::from_secs(5), watcher.run())
        .await
        .expect("watch loop did not stop")
        .unwrap();

    assert_eq!(
        printed(watcher.handler().get_ref()),
        vec!["B - not-a-number", "C - 1970-01-01 00:05:00"]
    );
}

#[tokio::test]
async fn nothing_printed_without_new_records() {
    let fetcher = ScriptedFetcher::new(vec![Ok(Vec::new())]);
    let mut watcher = Watcher::new(fetcher, Printer::new(Vec::<u8>::new()));

    let outcome = watcher.poll_once().await.unwrap();

    assert_eq!(outcome, CycleOutcome::NoNewRecords);
    assert!(watcher.handler().get_ref().is_empty());
}
