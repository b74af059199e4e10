use crate::{CursorLog, LogError, ShutdownCoordinator};

use std::time::Duration;

use tokio::time::{sleep, timeout};

#[tokio::test]
async fn given_publishes_when_receive_with_cursor_then_returns_all_after_cursor() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    log.publish("a");
    log.publish("b");
    log.publish("c");

    let (cursor, batch) = log.receive(1).await.expect("receive should succeed");

    assert_eq!(cursor, 3);
    assert_eq!(batch, vec!["b".to_string(), "c".to_string()]);
}

#[tokio::test]
async fn given_history_when_receive_with_cursor_zero_then_history_is_skipped() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    log.publish("old-1");
    log.publish("old-2");

    let writer = log.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        writer.publish("new");
    });

    let (cursor, batch) = timeout(Duration::from_secs(1), log.receive(0))
        .await
        .expect("receive should wake")
        .expect("receive should succeed");

    assert_eq!(cursor, 3);
    assert_eq!(batch, vec!["new".to_string()]);
}

#[tokio::test]
async fn given_blocked_reader_when_publish_then_reader_wakes() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    let reader = log.clone();
    let handle = tokio::spawn(async move { reader.receive(0).await });

    sleep(Duration::from_millis(50)).await;
    log.publish("wake up");

    let (cursor, batch) = timeout(Duration::from_secs(1), handle)
        .await
        .expect("reader should wake")
        .expect("reader task should not panic")
        .expect("receive should succeed");

    assert_eq!(cursor, 1);
    assert_eq!(batch, vec!["wake up".to_string()]);
}

#[tokio::test]
async fn given_returned_cursor_when_concurrent_publish_then_next_receive_sees_it() {
    // No-lost-update: a publish strictly after a reader observed cursor C
    // must be visible to that reader's next receive(C).
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    let reader = log.clone();
    let first_read = tokio::spawn(async move { reader.receive(0).await });
    sleep(Duration::from_millis(50)).await;
    log.publish("first");

    let (cursor, batch) = timeout(Duration::from_secs(1), first_read)
        .await
        .expect("reader should wake")
        .expect("reader task should not panic")
        .expect("receive should succeed");
    assert_eq!((cursor, batch.len()), (1, 1));

    let reader = log.clone();
    let handle = tokio::spawn(async move { reader.receive(cursor).await });

    sleep(Duration::from_millis(50)).await;
    log.publish("second");

    let (new_cursor, batch) = timeout(Duration::from_secs(1), handle)
        .await
        .expect("entry must never be silently dropped")
        .expect("reader task should not panic")
        .expect("receive should succeed");

    assert_eq!(new_cursor, 2);
    assert_eq!(batch, vec!["second".to_string()]);
}

#[tokio::test]
async fn given_two_blocked_readers_when_publish_then_both_wake() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    let reader_a = log.clone();
    let reader_b = log.clone();
    let handle_a = tokio::spawn(async move { reader_a.receive(0).await });
    let handle_b = tokio::spawn(async move { reader_b.receive(0).await });

    sleep(Duration::from_millis(50)).await;
    log.publish("broadcast");

    for handle in [handle_a, handle_b] {
        let (cursor, batch) = timeout(Duration::from_secs(1), handle)
            .await
            .expect("reader should wake")
            .expect("reader task should not panic")
            .expect("receive should succeed");
        assert_eq!(cursor, 1);
        assert_eq!(batch, vec!["broadcast".to_string()]);
    }
}

#[tokio::test]
async fn given_shutdown_when_reader_blocked_then_receive_returns_closed() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    let reader = log.clone();
    let handle = tokio::spawn(async move { reader.receive(0).await });

    sleep(Duration::from_millis(50)).await;
    shutdown.shutdown();

    let result = timeout(Duration::from_secs(1), handle)
        .await
        .expect("reader should wake on shutdown")
        .expect("reader task should not panic");

    assert_eq!(result, Err(LogError::Closed));
}

#[tokio::test]
async fn given_shutdown_already_fired_when_receive_then_returns_closed_immediately() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);
    shutdown.shutdown();

    let result = log.receive(0).await;

    assert_eq!(result, Err(LogError::Closed));
}

#[tokio::test]
async fn given_empty_log_when_receive_then_blocks() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    let result = timeout(Duration::from_millis(100), log.receive(0)).await;

    assert!(result.is_err(), "receive on an empty log must not return");
}

#[tokio::test]
async fn given_pruned_prefix_when_receive_with_stale_cursor_then_returns_retained_entries() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    log.publish("e1");
    log.publish("e2");
    sleep(Duration::from_millis(10)).await;
    let cut = std::time::Instant::now();
    sleep(Duration::from_millis(10)).await;
    log.publish("e3");
    log.publish("e4");

    log.prune(cut);

    // Cursor 1 points below the pruned range: the reader gets everything
    // still retained above it, without error.
    let (cursor, batch) = log.receive(1).await.expect("receive should succeed");

    assert_eq!(cursor, 4);
    assert_eq!(batch, vec!["e3".to_string(), "e4".to_string()]);
}

#[tokio::test]
async fn given_fully_pruned_log_when_publish_then_ids_keep_increasing() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    log.publish("a");
    log.publish("b");
    sleep(Duration::from_millis(10)).await;
    log.prune(std::time::Instant::now());

    assert_eq!(log.last_id(), 2);

    log.publish("c");

    let (cursor, batch) = log.receive(2).await.expect("receive should succeed");
    assert_eq!(cursor, 3);
    assert_eq!(batch, vec!["c".to_string()]);
}

#[tokio::test]
async fn given_blocked_reader_when_prune_runs_then_reader_still_gets_new_entries() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    log.publish("seen");
    let reader = log.clone();
    let handle = tokio::spawn(async move { reader.receive(1).await });

    sleep(Duration::from_millis(50)).await;
    log.prune(std::time::Instant::now());
    log.publish("fresh");

    let (cursor, batch) = timeout(Duration::from_secs(1), handle)
        .await
        .expect("reader should wake")
        .expect("reader task should not panic")
        .expect("receive should succeed");

    assert_eq!(cursor, 2);
    assert_eq!(batch, vec!["fresh".to_string()]);
}

#[test]
fn given_new_log_when_nothing_published_then_last_id_is_zero() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    assert_eq!(log.last_id(), 0);
}

#[test]
fn given_publishes_when_last_id_queried_then_tracks_newest_entry() {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);

    log.publish("a");
    assert_eq!(log.last_id(), 1);
    log.publish("b");
    assert_eq!(log.last_id(), 2);
}
