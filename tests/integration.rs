//! Integration tests for the bounded batch fetcher

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio_test::{assert_pending, assert_ready};
use tokio_util::sync::CancellationToken;

use domain_scout::fetch::AdmissionGate;
use domain_scout::{BoundedBatchFetcher, FailureKind, Outcome, ScoutError};

use helpers::{config, keys, FakeTransport, Reply};

#[tokio::test]
async fn test_mixed_batch_under_bound() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_reply("ab", Reply::NotFound)
            .with_reply("cd", Reply::Record)
            .with_reply("ef", Reply::Hang)
            .with_delay(Duration::from_millis(20)),
    );
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_millis(200)),
        Arc::clone(&fake),
    )
    .unwrap();

    let results = fetcher.fetch_all(["ab", "cd", "ef"]).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results.outcome("ab"), Some(Outcome::Available));
    assert_eq!(results.outcome("cd"), Some(Outcome::Taken));
    assert_eq!(results.outcome("ef"), Some(Outcome::Unknown));
    assert_eq!(results.get("ef").unwrap().failure, Some(FailureKind::Timeout));
    assert!(fake.peak() <= 2);
    assert_eq!(fetcher.gate().available(), 2);
}

#[tokio::test]
async fn test_every_key_gets_one_record_for_any_bound() {
    let batch = keys(6);
    for concurrency in 1..=batch.len() {
        let fake = Arc::new(FakeTransport::new().with_delay(Duration::from_millis(5)));
        let fetcher = BoundedBatchFetcher::with_transport(
            config(concurrency, Duration::from_secs(2)),
            Arc::clone(&fake),
        )
        .unwrap();

        let results = fetcher.fetch_all(batch.clone()).await.unwrap();

        assert_eq!(results.len(), batch.len(), "concurrency {concurrency}");
        assert!(batch.iter().all(|k| results.contains(k)));
        assert!(fake.peak() <= concurrency, "peak {} > {}", fake.peak(), concurrency);
        assert_eq!(fake.calls().len(), batch.len());
    }
}

#[tokio::test]
async fn test_bound_holds_on_large_batch() {
    let fake = Arc::new(FakeTransport::new().with_delay(Duration::from_millis(10)));
    let fetcher = BoundedBatchFetcher::with_transport(
        config(5, Duration::from_secs(2)),
        Arc::clone(&fake),
    )
    .unwrap();

    let results = fetcher.fetch_all(keys(50)).await.unwrap();

    assert_eq!(results.len(), 50);
    assert_eq!(results.count(Outcome::Available), 50);
    assert!(fake.peak() <= 5);
    assert!(fake.peak() > 1, "batch should overlap requests");

    let stats = fetcher.get_metrics_snapshot();
    assert!(stats.peak_in_flight <= 5);
    assert_eq!(stats.domains_checked, 50);
    assert_eq!(stats.errors_encountered, 0);
    assert_eq!(stats.last_batch.map(|b| b.summary.available), Some(50));
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_default(Reply::Record)
            .with_reply("k001.ai", Reply::Fail)
            .with_reply("k002.ai", Reply::Body("<html>rate limited</html>".to_string()))
            .with_reply("k003.ai", Reply::NotFound),
    );
    let fetcher = BoundedBatchFetcher::with_transport(
        config(3, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap();

    let results = fetcher.fetch_all(keys(6)).await.unwrap();

    assert_eq!(results.len(), 6);
    let network = results.get("k001.ai").unwrap();
    assert_eq!(network.outcome, Outcome::Unknown);
    assert_eq!(network.failure, Some(FailureKind::Network));
    assert!(network.error_message.is_some());

    let parse = results.get("k002.ai").unwrap();
    assert_eq!(parse.outcome, Outcome::Unknown);
    assert_eq!(parse.failure, Some(FailureKind::Parse));

    assert_eq!(results.outcome("k003.ai"), Some(Outcome::Available));
    assert_eq!(results.taken(), vec!["k000.ai", "k004.ai", "k005.ai"]);
    assert_eq!(results.unknown_keys(), vec!["k001.ai", "k002.ai"]);
}

#[tokio::test]
async fn test_classification_ignores_everything_but_error_code() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_reply(
                "a.ai",
                Reply::Body(r#"{"errorCode":429,"title":"Too Many Requests"}"#.to_string()),
            )
            .with_reply("b.ai", Reply::Body("[]".to_string()))
            .with_reply("c.ai", Reply::Body(r#"{"errorCode":404}"#.to_string())),
    );
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap();

    let results = fetcher.fetch_all(["a.ai", "b.ai", "c.ai"]).await.unwrap();

    let limited = results.get("a.ai").unwrap();
    assert_eq!(limited.outcome, Outcome::Taken);
    assert_eq!(limited.error_code, Some(429));
    assert_eq!(results.outcome("b.ai"), Some(Outcome::Taken));
    assert_eq!(results.outcome("c.ai"), Some(Outcome::Available));
}

#[tokio::test]
async fn test_timeouts_release_slots() {
    let fake = Arc::new(FakeTransport::new().with_default(Reply::Hang));
    let fetcher = BoundedBatchFetcher::with_transport(
        config(1, Duration::from_millis(50)),
        Arc::clone(&fake),
    )
    .unwrap();

    let started = Instant::now();
    let results = fetcher.fetch_all(keys(3)).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(results.count(Outcome::Unknown), 3);
    assert!(results.iter().all(|r| r.failure == Some(FailureKind::Timeout)));
    assert_eq!(fetcher.gate().available(), 1);
    assert_eq!(fake.in_flight(), 0);
}

#[tokio::test]
async fn test_fetcher_is_reusable() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_reply("k000.ai", Reply::Fail)
            .with_reply("k001.ai", Reply::Hang),
    );
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_millis(100)),
        Arc::clone(&fake),
    )
    .unwrap();

    let first = fetcher.fetch_all(keys(4)).await.unwrap();
    assert_eq!(first.count(Outcome::Unknown), 2);
    assert_eq!(fetcher.gate().available(), 2);

    let second = fetcher.fetch_all(["zz.ai", "yy.ai"]).await.unwrap();
    assert_eq!(second.count(Outcome::Available), 2);
    assert_eq!(fetcher.gate().available(), 2);
}

#[tokio::test]
async fn test_unknown_keys_recheck_and_merge() {
    let fake = Arc::new(FakeTransport::new().with_reply("k001.ai", Reply::Fail));
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap();
    let first = fetcher.fetch_all(keys(3)).await.unwrap();
    assert_eq!(first.unknown_keys(), vec!["k001.ai"]);

    let healthy = Arc::new(FakeTransport::new().with_reply("k001.ai", Reply::Record));
    let recheck = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_secs(1)),
        Arc::clone(&healthy),
    )
    .unwrap();
    let second = recheck.fetch_all(first.unknown_keys()).await.unwrap();

    let merged = first.merge(second);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.outcome("k001.ai"), Some(Outcome::Taken));
    assert!(merged.unknown_keys().is_empty());
    assert_eq!(healthy.calls(), vec!["k001.ai"]);
}

#[tokio::test]
async fn test_pre_cancelled_batch_sends_nothing() {
    let fake = Arc::new(FakeTransport::new());
    let token = CancellationToken::new();
    token.cancel();
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap()
    .with_cancellation(token);

    let results = fetcher.fetch_all(keys(4)).await.unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results.count(Outcome::NotAttempted), 4);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_cancel_mid_batch_keeps_finished_results() {
    let fake = Arc::new(FakeTransport::new().with_delay(Duration::from_millis(30)));
    let token = CancellationToken::new();
    let fetcher = BoundedBatchFetcher::with_transport(
        config(1, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap()
    .with_cancellation(token.clone());

    let mut stream = fetcher.fetch_stream(keys(5)).unwrap();
    let first = stream.next().await.unwrap();
    assert_eq!(first.outcome, Outcome::Available);
    token.cancel();

    let rest: Vec<_> = stream.collect().await;
    assert_eq!(rest.len(), 4);
    assert!(rest.iter().all(|r| r.outcome != Outcome::Unknown));

    let not_attempted = rest.iter().filter(|r| r.outcome == Outcome::NotAttempted).count();
    assert!(not_attempted >= 3, "only {not_attempted} keys were skipped");
    assert_eq!(fake.calls().len(), 5 - not_attempted);
    assert_eq!(fetcher.gate().available(), 1);
}

#[tokio::test]
async fn test_stream_ends_after_last_record() {
    let fake = Arc::new(FakeTransport::new().with_delay(Duration::from_millis(2)));
    let fetcher = BoundedBatchFetcher::with_transport(
        config(3, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap();

    let mut stream = fetcher.fetch_stream(keys(7)).unwrap();
    let mut seen = Vec::new();
    while let Some(record) = stream.next().await {
        seen.push(record.key);
    }
    seen.sort();

    assert_eq!(seen, keys(7));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_pacing_spaces_requests() {
    let fake = Arc::new(FakeTransport::new());
    let fetcher = BoundedBatchFetcher::with_transport(
        config(1, Duration::from_secs(1)).with_pacing(Duration::from_millis(30)),
        Arc::clone(&fake),
    )
    .unwrap();

    let started = Instant::now();
    let results = fetcher.fetch_all(keys(3)).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(90));
}

#[tokio::test]
async fn test_zero_concurrency_fails_fast() {
    let fake = Arc::new(FakeTransport::new());
    let err = BoundedBatchFetcher::with_transport(
        config(0, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .err()
    .unwrap();

    assert!(matches!(err, ScoutError::Config { .. }));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_duplicates_are_collapsed() {
    let fake = Arc::new(FakeTransport::new());
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap();

    let results = fetcher.fetch_all(["ab.ai", "cd.ai", "ab.ai"]).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(fake.calls().len(), 2);
}

#[tokio::test]
async fn test_unsafe_key_rejects_batch() {
    let fake = Arc::new(FakeTransport::new());
    let fetcher = BoundedBatchFetcher::with_transport(
        config(2, Duration::from_secs(1)),
        Arc::clone(&fake),
    )
    .unwrap();

    let err = fetcher.fetch_all(["ab.ai", "../admin"]).await.unwrap_err();

    assert!(matches!(err, ScoutError::Validation { .. }));
    assert!(fake.calls().is_empty());
}

#[test]
fn test_gate_admits_waiter_when_slot_frees() {
    let gate = AdmissionGate::new(1).unwrap();
    let held = gate.try_acquire().unwrap();
    assert_eq!(gate.available(), 0);

    let mut waiter = tokio_test::task::spawn(gate.acquire());
    assert_pending!(waiter.poll());

    drop(held);
    assert!(waiter.is_woken());
    let permit = assert_ready!(waiter.poll()).unwrap();
    assert_eq!(gate.available(), 0);

    drop(permit);
    assert_eq!(gate.available(), 1);
}
