use crate::{Applause, ApplauseError, CountingBackend, MemoryBackend};

use std::sync::Arc;
use std::time::Duration;

use ovation_log::{CursorLog, ShutdownCoordinator};
use tokio::time::{sleep, timeout};

fn applause_fixture() -> (Applause, Arc<MemoryBackend>, CursorLog, ShutdownCoordinator) {
    let shutdown = ShutdownCoordinator::new();
    let log = CursorLog::new(&shutdown);
    let backend = Arc::new(MemoryBackend::new());
    let applause = Applause::new(backend.clone(), log.clone());
    (applause, backend, log, shutdown)
}

#[tokio::test]
async fn given_repeated_sends_then_backend_counts_user_once() {
    let (applause, backend, _log, _shutdown) = applause_fixture();

    applause.send(5, 10).await.expect("send");
    applause.send(5, 10).await.expect("send");

    let counts = backend.since(0).await.expect("since");
    assert_eq!(counts.get(&5), Some(&1));
}

#[tokio::test]
async fn given_batch_with_several_entries_then_receive_returns_newest_for_meeting() {
    let (applause, _backend, log, _shutdown) = applause_fixture();

    // Sentinel so the batch below can be addressed from cursor 1.
    log.publish("{}");
    log.publish(r#"{"1":{"level":1,"present_users":3}}"#);
    log.publish(r#"{"2":{"level":4,"present_users":9}}"#);
    log.publish(r#"{"1":{"level":2,"present_users":3},"2":{"level":5,"present_users":9}}"#);

    let (cursor, update) = applause.receive(1, 1).await.expect("receive");

    // The oldest mention of meeting 1 is skipped, the newest one wins, and
    // the cursor lands on the last entry of the batch.
    assert_eq!(cursor, 4);
    assert_eq!(update.level, 2);
    assert_eq!(update.present_users, 3);
}

#[tokio::test]
async fn given_updates_for_other_meetings_then_receive_keeps_waiting() {
    let (applause, _backend, log, _shutdown) = applause_fixture();

    let receiver = applause.clone();
    let handle = tokio::spawn(async move { receiver.receive(0, 1).await });

    sleep(Duration::from_millis(50)).await;
    log.publish(r#"{"2":{"level":4,"present_users":9}}"#);
    sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished(), "unrelated meeting must not wake the poll");

    log.publish(r#"{"1":{"level":1,"present_users":3}}"#);

    let (cursor, update) = timeout(Duration::from_secs(1), handle)
        .await
        .expect("receive should wake")
        .expect("receive task should not panic")
        .expect("receive should succeed");

    assert_eq!(cursor, 2);
    assert_eq!(update.level, 1);
}

#[tokio::test]
async fn given_shutdown_then_blocked_receive_ends_with_cancellation() {
    let (applause, _backend, _log, shutdown) = applause_fixture();

    let receiver = applause.clone();
    let handle = tokio::spawn(async move { receiver.receive(0, 1).await });

    sleep(Duration::from_millis(50)).await;
    shutdown.shutdown();

    let result = timeout(Duration::from_secs(1), handle)
        .await
        .expect("receive should end on shutdown")
        .expect("receive task should not panic");

    match result {
        Err(err) => assert!(err.is_cancellation()),
        Ok(_) => panic!("receive must not succeed after shutdown"),
    }
}

#[tokio::test]
async fn given_malformed_log_entry_then_receive_reports_decode_error() {
    let (applause, _backend, log, _shutdown) = applause_fixture();

    log.publish("{}");
    log.publish("not json");

    let result = applause.receive(1, 1).await;

    assert!(matches!(result, Err(ApplauseError::Decode { .. })));
}

#[tokio::test]
async fn given_no_entries_then_last_id_is_zero() {
    let (applause, _backend, _log, _shutdown) = applause_fixture();

    assert_eq!(applause.last_id(), 0);
}
