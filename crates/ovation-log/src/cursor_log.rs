use crate::{LogError, Result as LogErrorResult, ShutdownCoordinator};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use metrics::{counter, gauge};
use tokio::sync::watch;

/// Append-only in-memory broadcast log addressed by monotonic ids.
///
/// One writer publishes opaque payloads, arbitrarily many readers block in
/// [`CursorLog::receive`] until an entry newer than their cursor exists.
/// Entries are never mutated or reordered; they only leave the log through
/// [`CursorLog::prune`]. Ids start at 1 and are never reused, so 0 is free
/// to mean "no cursor yet".
pub struct CursorLog {
    inner: Arc<Mutex<LogInner>>,
    /// Last assigned id, doubling as the wake-all broadcast primitive.
    last_id_tx: watch::Sender<u64>,
    closed: watch::Receiver<bool>,
}

struct LogInner {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

struct LogEntry {
    id: u64,
    payload: String,
    inserted_at: Instant,
}

impl CursorLog {
    /// Create a log wired to the process-wide shutdown signal. Blocked
    /// readers observe the signal and return [`LogError::Closed`].
    pub fn new(shutdown: &ShutdownCoordinator) -> Self {
        let (last_id_tx, _) = watch::channel(0);

        Self {
            inner: Arc::new(Mutex::new(LogInner {
                entries: VecDeque::new(),
                next_id: 1,
            })),
            last_id_tx,
            closed: shutdown.subscribe(),
        }
    }

    /// Append a payload under the next sequential id and wake every reader
    /// blocked on a lower cursor. Infallible.
    pub fn publish(&self, payload: impl Into<String>) {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push_back(LogEntry {
                id,
                payload: payload.into(),
                inserted_at: Instant::now(),
            });
            gauge!("ovation.log.entries").set(inner.entries.len() as f64);
            id
        };

        // send_replace wakes all subscribed receivers, including readers
        // that subscribed before this publish. That ordering is what rules
        // out lost wakeups.
        self.last_id_tx.send_replace(id);
        counter!("ovation.log.published").increment(1);
    }

    /// Block until at least one entry with id > `cursor` exists, then
    /// return all such payloads in id order together with the id of the
    /// last one.
    ///
    /// A cursor of 0 means "start listening now": history already in the
    /// log is not replayed, only entries published after this call begins
    /// are delivered. On success the batch is never empty.
    ///
    /// Returns [`LogError::Closed`] once the process-wide shutdown signal
    /// fires. Per-request cancellation is dropping the future.
    pub async fn receive(&self, cursor: u64) -> LogErrorResult<(u64, Vec<String>)> {
        // Subscribe before the first scan so a publish that lands between
        // the scan and the await still flips `changed()`.
        let mut updates = self.last_id_tx.subscribe();
        let mut closed = self.closed.clone();

        if *closed.borrow() {
            return Err(LogError::Closed);
        }

        let cursor = if cursor == 0 { *updates.borrow() } else { cursor };

        loop {
            {
                let inner = self.lock();
                let batch: Vec<String> = inner
                    .entries
                    .iter()
                    .skip_while(|entry| entry.id <= cursor)
                    .map(|entry| entry.payload.clone())
                    .collect();

                if !batch.is_empty() {
                    // Entries are id-ordered, so the newest is at the back.
                    let new_cursor = inner.entries.back().map(|e| e.id).unwrap_or(cursor);
                    return Ok((new_cursor, batch));
                }
            }

            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        // Writer side dropped, nothing will ever arrive.
                        return Err(LogError::Closed);
                    }
                }
                _ = closed.wait_for(|stop| *stop) => {
                    return Err(LogError::Closed);
                }
            }
        }
    }

    /// Highest id assigned so far (0 before the first publish). Lets a
    /// caller start listening from "now" without a throwaway receive.
    pub fn last_id(&self) -> u64 {
        *self.last_id_tx.borrow()
    }

    /// Discard entries inserted strictly before `before`.
    ///
    /// Ids are not reset, so monotonicity survives pruning. Readers that
    /// are already blocked keep their cursors; a stale low cursor simply
    /// sees only the entries still retained above it.
    pub fn prune(&self, before: Instant) {
        let mut inner = self.lock();
        let retained_before = inner.entries.len();

        while inner
            .entries
            .front()
            .is_some_and(|entry| entry.inserted_at < before)
        {
            inner.entries.pop_front();
        }

        let dropped = retained_before - inner.entries.len();
        if dropped > 0 {
            log::debug!(
                "Pruned {} log entries, {} retained",
                dropped,
                inner.entries.len()
            );
            counter!("ovation.log.pruned").increment(dropped as u64);
        }
        gauge!("ovation.log.entries").set(inner.entries.len() as f64);
    }

    fn lock(&self) -> MutexGuard<'_, LogInner> {
        // A panic while holding the lock cannot leave the buffer in a
        // half-written state (single push/pop operations), so poisoning is
        // recovered rather than propagated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for CursorLog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            last_id_tx: self.last_id_tx.clone(),
            closed: self.closed.clone(),
        }
    }
}
