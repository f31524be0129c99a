//! Background batching of bulk actions.
//!
//! # Design
//! A processor owns one thread per worker. `add` hands requests to the
//! workers round-robin over per-worker channels; each worker batches what it
//! receives and commits once the action count or the estimated byte size
//! crosses its threshold. A flush message carries an acknowledgement sender,
//! so `flush()` only returns after every worker has committed. Closing drops
//! the senders: each worker commits what is left and exits.
//!
//! A failed commit is retried with the configured backoff. Items that come
//! back with a retryable status are re-queued on their own and the retry
//! only resends those.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info, warn};

use super::bulk::{BulkResponse, BulkableRequest};
use crate::client::Client;
use crate::error::ApiError;

pub const DEFAULT_BULK_ACTIONS: i64 = 1000;
pub const DEFAULT_BULK_SIZE: i64 = 5 << 20;
pub const DEFAULT_RETRY_ITEM_STATUS_CODES: [u16; 4] = [408, 429, 503, 507];

pub type BeforeFn = Arc<dyn Fn(i64, &[BulkableRequest]) + Send + Sync>;
pub type AfterFn =
    Arc<dyn Fn(i64, &[BulkableRequest], Option<&BulkResponse>, Option<&ApiError>) + Send + Sync>;

/// Delay before retry number `retry` (0-based), or `None` to give up.
pub trait Backoff: Send + Sync + fmt::Debug {
    fn next(&self, retry: u32) -> Option<Duration>;
}

/// Doubles the delay on every retry, scaled by a random factor in `[1, 2)`,
/// and gives up once the jittered delay reaches `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_secs(10))
    }
}

impl Backoff for ExponentialBackoff {
    fn next(&self, retry: u32) -> Option<Duration> {
        let factor = 1u32.checked_shl(retry)?;
        let delay = self.initial.checked_mul(factor)?;
        let jitter: f64 = rand::thread_rng().gen_range(1.0..2.0);
        let delay = Duration::try_from_secs_f64(delay.as_secs_f64() * jitter).ok()?;
        (delay < self.max).then_some(delay)
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopBackoff;

impl Backoff for StopBackoff {
    fn next(&self, _retry: u32) -> Option<Duration> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkProcessorStats {
    /// Number of flushes, manual or periodic.
    pub flushed: i64,
    pub committed: i64,
    pub indexed: i64,
    pub created: i64,
    pub updated: i64,
    pub deleted: i64,
    pub succeeded: i64,
    pub failed: i64,
    pub workers: Vec<BulkProcessorWorkerStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkProcessorWorkerStats {
    pub queued: i64,
    /// `took` of the last commit.
    pub last_duration: Duration,
}

impl Client {
    pub fn bulk_processor(&self) -> BulkProcessorBuilder {
        BulkProcessorBuilder::new(self.clone())
    }
}

/// Configures and starts a [`BulkProcessor`].
pub struct BulkProcessorBuilder {
    client: Client,
    name: String,
    workers: usize,
    bulk_actions: i64,
    bulk_size: i64,
    flush_interval: Option<Duration>,
    want_stats: bool,
    backoff: Arc<dyn Backoff>,
    retry_item_status_codes: BTreeSet<u16>,
    before: Option<BeforeFn>,
    after: Option<AfterFn>,
}

impl fmt::Debug for BulkProcessorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkProcessorBuilder")
            .field("name", &self.name)
            .field("workers", &self.workers)
            .field("bulk_actions", &self.bulk_actions)
            .field("bulk_size", &self.bulk_size)
            .field("flush_interval", &self.flush_interval)
            .finish_non_exhaustive()
    }
}

impl BulkProcessorBuilder {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            name: String::new(),
            workers: 1,
            bulk_actions: DEFAULT_BULK_ACTIONS,
            bulk_size: DEFAULT_BULK_SIZE,
            flush_interval: None,
            want_stats: false,
            backoff: Arc::new(ExponentialBackoff::default()),
            retry_item_status_codes: DEFAULT_RETRY_ITEM_STATUS_CODES.into_iter().collect(),
            before: None,
            after: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Values below 1 are raised to 1.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Commit after this many actions. Negative disables the threshold.
    pub fn bulk_actions(mut self, actions: i64) -> Self {
        self.bulk_actions = actions;
        self
    }

    /// Commit once the body reaches this many bytes. Negative disables the threshold.
    pub fn bulk_size(mut self, bytes: i64) -> Self {
        self.bulk_size = bytes;
        self
    }

    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = Some(interval);
        self
    }

    pub fn stats(mut self, enabled: bool) -> Self {
        self.want_stats = enabled;
        self
    }

    pub fn backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    pub fn retry_item_status_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.retry_item_status_codes = codes.into_iter().collect();
        self
    }

    pub fn before<F>(mut self, f: F) -> Self
    where
        F: Fn(i64, &[BulkableRequest]) + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(f));
        self
    }

    pub fn after<F>(mut self, f: F) -> Self
    where
        F: Fn(i64, &[BulkableRequest], Option<&BulkResponse>, Option<&ApiError>) + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(f));
        self
    }

    /// Build the processor and start its workers.
    pub fn start(self) -> BulkProcessor {
        let shared = Arc::new(Shared {
            client: self.client,
            name: self.name,
            bulk_actions: self.bulk_actions,
            bulk_size: self.bulk_size,
            want_stats: self.want_stats,
            backoff: self.backoff,
            retry_item_status_codes: self.retry_item_status_codes,
            before: self.before,
            after: self.after,
            execution_id: AtomicI64::new(0),
            stats: Mutex::new(BulkProcessorStats::default()),
        });
        let processor = BulkProcessor {
            shared,
            workers: self.workers,
            flush_interval: self.flush_interval,
            next_worker: AtomicUsize::new(0),
            running: Mutex::new(None),
        };
        processor.start();
        processor
    }
}

struct Shared {
    client: Client,
    name: String,
    bulk_actions: i64,
    bulk_size: i64,
    want_stats: bool,
    backoff: Arc<dyn Backoff>,
    retry_item_status_codes: BTreeSet<u16>,
    before: Option<BeforeFn>,
    after: Option<AfterFn>,
    execution_id: AtomicI64,
    stats: Mutex<BulkProcessorStats>,
}

enum WorkerMessage {
    Request(BulkableRequest),
    Flush(Sender<()>),
}

struct Running {
    senders: Vec<Sender<WorkerMessage>>,
    handles: Vec<JoinHandle<()>>,
    flusher: Option<(Sender<()>, JoinHandle<()>)>,
}

/// Batches bulk actions in the background and commits them from worker threads.
///
/// Dropping the processor closes it.
pub struct BulkProcessor {
    shared: Arc<Shared>,
    workers: usize,
    flush_interval: Option<Duration>,
    next_worker: AtomicUsize,
    running: Mutex<Option<Running>>,
}

impl fmt::Debug for BulkProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkProcessor")
            .field("name", &self.shared.name)
            .field("workers", &self.workers)
            .field("running", &self.is_running())
            .finish()
    }
}

impl BulkProcessor {
    /// Start the workers. No-op when already running.
    pub fn start(&self) {
        let mut running = self.running.lock();
        if running.is_some() {
            return;
        }

        self.shared.execution_id.store(0, Ordering::SeqCst);
        *self.shared.stats.lock() = BulkProcessorStats {
            workers: vec![BulkProcessorWorkerStats::default(); self.workers],
            ..Default::default()
        };

        let mut senders = Vec::with_capacity(self.workers);
        let mut handles = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let (tx, rx) = mpsc::channel();
            let worker = Worker {
                index,
                shared: Arc::clone(&self.shared),
                rx,
                pending: Vec::new(),
                pending_bytes: 0,
            };
            senders.push(tx);
            handles.push(thread::spawn(move || worker.run()));
        }

        let flusher = self.flush_interval.filter(|d| !d.is_zero()).map(|interval| {
            let (stop_tx, stop_rx) = mpsc::channel::<()>();
            let shared = Arc::clone(&self.shared);
            let senders = senders.clone();
            let handle = thread::spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => flush_all(&shared, &senders),
                    _ => break,
                }
            });
            (stop_tx, handle)
        });

        info!(name = %self.shared.name, workers = self.workers, "bulk processor started");
        *running = Some(Running { senders, handles, flusher });
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Queue one action for the next commit.
    pub fn add(&self, request: impl Into<BulkableRequest>) -> Result<(), ApiError> {
        let running = self.running.lock();
        let running = running
            .as_ref()
            .ok_or_else(|| ApiError::InvalidArgument("bulk processor is not running".into()))?;
        let slot = self.next_worker.fetch_add(1, Ordering::Relaxed) % running.senders.len();
        running.senders[slot]
            .send(WorkerMessage::Request(request.into()))
            .map_err(|_| ApiError::InvalidArgument("bulk processor worker has stopped".into()))
    }

    /// Commit every worker's outstanding actions and wait until all are done.
    pub fn flush(&self) {
        // Hooks run on worker threads and may call `add` while we wait.
        let senders = self.running.lock().as_ref().map(|r| r.senders.clone());
        if let Some(senders) = senders {
            flush_all(&self.shared, &senders);
        }
    }

    /// Commit what is left, stop the workers and wait for them. No-op when stopped.
    pub fn close(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };
        if let Some((stop, handle)) = running.flusher {
            drop(stop);
            let _ = handle.join();
        }
        drop(running.senders);
        for handle in running.handles {
            if handle.join().is_err() {
                warn!(name = %self.shared.name, "bulk processor worker panicked");
            }
        }
        info!(name = %self.shared.name, "bulk processor stopped");
    }

    /// Snapshot of the counters. Only updated when stats were enabled.
    pub fn stats(&self) -> BulkProcessorStats {
        self.shared.stats.lock().clone()
    }
}

impl Drop for BulkProcessor {
    fn drop(&mut self) {
        self.close();
    }
}

fn flush_all(shared: &Shared, senders: &[Sender<WorkerMessage>]) {
    shared.stats.lock().flushed += 1;
    for sender in senders {
        let (ack_tx, ack_rx) = mpsc::channel();
        if sender.send(WorkerMessage::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

struct Worker {
    index: usize,
    shared: Arc<Shared>,
    rx: Receiver<WorkerMessage>,
    pending: Vec<BulkableRequest>,
    pending_bytes: u64,
}

impl Worker {
    fn run(mut self) {
        while let Ok(message) = self.rx.recv() {
            match message {
                WorkerMessage::Request(request) => match request.estimated_size_in_bytes() {
                    Ok(size) => {
                        self.pending.push(request);
                        self.pending_bytes += size;
                        if self.commit_required() {
                            self.commit();
                        }
                    }
                    Err(e) => warn!(name = %self.shared.name, error = %e, "dropping bulk action"),
                },
                WorkerMessage::Flush(ack) => {
                    if !self.pending.is_empty() {
                        self.commit();
                    }
                    let _ = ack.send(());
                }
            }
        }
        if !self.pending.is_empty() {
            self.commit();
        }
    }

    fn commit_required(&self) -> bool {
        let shared = &self.shared;
        (shared.bulk_actions >= 0 && self.pending.len() as i64 >= shared.bulk_actions)
            || (shared.bulk_size >= 0 && self.pending_bytes as i64 >= shared.bulk_size)
    }

    fn commit(&mut self) {
        let shared = Arc::clone(&self.shared);
        let id = shared.execution_id.fetch_add(1, Ordering::SeqCst) + 1;
        let requests = std::mem::take(&mut self.pending);
        self.pending_bytes = 0;

        if shared.want_stats {
            if let Some(worker) = shared.stats.lock().workers.get_mut(self.index) {
                worker.queued = requests.len() as i64;
            }
        }
        if let Some(before) = &shared.before {
            before(id, &requests);
        }

        let mut batch = requests.clone();
        let mut retry = 0;
        let (response, error) = loop {
            let (response, error) = match self.send_batch(&batch) {
                Ok((response, retryable)) if retryable.is_empty() => (Some(response), None),
                Ok((response, retryable)) => {
                    let count = retryable.len();
                    batch = retryable;
                    (Some(response), Some(ApiError::BulkItemRetry { count }))
                }
                Err(e) => (None, Some(e)),
            };
            let Some(err) = error else {
                break (response, None);
            };
            match shared.backoff.next(retry) {
                Some(delay) => {
                    warn!(name = %shared.name, execution_id = id, error = %err, "bulk commit failed but may retry");
                    thread::sleep(delay);
                    retry += 1;
                }
                None => {
                    warn!(name = %shared.name, execution_id = id, error = %err, "bulk commit failed");
                    break (response, Some(err));
                }
            }
        };

        if let Some(response) = &response {
            self.update_stats(response);
        }
        debug!(name = %shared.name, execution_id = id, actions = requests.len(), "bulk commit finished");
        if let Some(after) = &shared.after {
            after(id, &requests, response.as_ref(), error.as_ref());
        }
    }

    /// Sends one batch; returns the response and the actions to resend.
    fn send_batch(
        &self,
        batch: &[BulkableRequest],
    ) -> Result<(BulkResponse, Vec<BulkableRequest>), ApiError> {
        let response = self
            .shared
            .client
            .bulk()
            .add_all(batch.iter().cloned())
            .send()?;
        let mut retryable = Vec::new();
        if response.errors && !self.shared.retry_item_status_codes.is_empty() {
            for (request, item) in batch.iter().zip(&response.items) {
                let retry = item
                    .values()
                    .any(|r| self.shared.retry_item_status_codes.contains(&r.status));
                if retry {
                    retryable.push(request.clone());
                }
            }
        }
        Ok((response, retryable))
    }

    fn update_stats(&self, response: &BulkResponse) {
        if !self.shared.want_stats {
            return;
        }
        let mut stats = self.shared.stats.lock();
        stats.committed += 1;
        stats.indexed += response.indexed().len() as i64;
        stats.created += response.created().len() as i64;
        stats.updated += response.updated().len() as i64;
        stats.deleted += response.deleted().len() as i64;
        stats.succeeded += response.succeeded().len() as i64;
        stats.failed += response.failed().len() as i64;
        if let Some(worker) = stats.workers.get_mut(self.index) {
            worker.queued = self.pending.len() as i64;
            worker.last_duration = Duration::from_millis(response.took.max(0) as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bulk::{BulkDeleteRequest, BulkIndexRequest};
    use crate::http::TransportError;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::{OnceLock, Weak};

    const ONE_CREATED: &str =
        r#"{"took":3,"errors":false,"items":[{"index":{"_index":"t","_id":"1","status":201}}]}"#;

    fn doc(id: &str) -> BulkIndexRequest {
        BulkIndexRequest::new().index("t").id(id).doc(json!({"n": id}))
    }

    fn wait_until(mut done: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn exponential_backoff_doubles_with_jitter_until_max() {
        let backoff = ExponentialBackoff::default();
        for _ in 0..50 {
            let first = backoff.next(0).unwrap();
            assert!(first >= Duration::from_millis(200) && first < Duration::from_millis(400));
            let second = backoff.next(1).unwrap();
            assert!(second >= Duration::from_millis(400) && second < Duration::from_millis(800));
            // 200ms * 2^6 is past the 10s cap before any jitter
            assert_eq!(backoff.next(6), None);
        }
        assert_eq!(StopBackoff.next(0), None);
    }

    #[test]
    fn commits_when_action_threshold_is_reached() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"took":5,"errors":false,"items":[
                {"index":{"_index":"t","_id":"1","status":201}},
                {"index":{"_index":"t","_id":"2","status":201}}]}"#,
        );
        let processor = transport
            .client()
            .bulk_processor()
            .name("test")
            .bulk_actions(2)
            .bulk_size(-1)
            .stats(true)
            .start();

        processor.add(doc("1")).unwrap();
        processor.add(doc("2")).unwrap();
        processor.flush();

        let stats = processor.stats();
        assert_eq!(stats.committed, 1);
        assert_eq!(stats.indexed, 2);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.flushed, 1);
        assert_eq!(stats.workers[0].last_duration, Duration::from_millis(5));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn flush_commits_pending_actions_and_calls_hooks() {
        let transport = ScriptedTransport::new();
        transport.respond(200, ONE_CREATED);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let before_seen = Arc::clone(&seen);
        let after_seen = Arc::clone(&seen);

        let processor = transport
            .client()
            .bulk_processor()
            .before(move |id, reqs| before_seen.lock().push(format!("before {id} {}", reqs.len())))
            .after(move |id, _, resp, err| {
                after_seen
                    .lock()
                    .push(format!("after {id} {} {}", resp.is_some(), err.is_some()))
            })
            .start();

        processor.add(doc("1")).unwrap();
        processor.flush();
        assert_eq!(*seen.lock(), vec!["before 1 1", "after 1 true false"]);

        // nothing pending: flush does not commit
        processor.flush();
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn flush_interval_commits_without_manual_flush() {
        let transport = ScriptedTransport::new();
        transport.respond(200, ONE_CREATED);
        let processor = transport
            .client()
            .bulk_processor()
            .flush_interval(Duration::from_millis(20))
            .stats(true)
            .start();

        processor.add(doc("1")).unwrap();
        assert!(wait_until(|| processor.stats().committed == 1));
        assert!(processor.stats().flushed >= 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn commits_when_size_threshold_is_reached() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"took":1,"errors":false,"items":[
                {"index":{"_index":"t","_id":"1","status":201}},
                {"index":{"_index":"t","_id":"2","status":201}}]}"#,
        );
        let size = BulkableRequest::from(doc("1")).estimated_size_in_bytes().unwrap() as i64;
        let processor = transport
            .client()
            .bulk_processor()
            .bulk_actions(-1)
            .bulk_size(2 * size)
            .stats(true)
            .start();

        processor.add(doc("1")).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(processor.stats().committed, 0);

        processor.add(doc("2")).unwrap();
        assert!(wait_until(|| processor.stats().committed == 1));
        let stats = processor.stats();
        assert_eq!(stats.flushed, 0);
        assert_eq!(stats.indexed, 2);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn workers_take_actions_round_robin() {
        let transport = ScriptedTransport::new();
        transport.respond(200, ONE_CREATED);
        transport.respond(200, ONE_CREATED);
        let processor = transport
            .client()
            .bulk_processor()
            .workers(2)
            .bulk_actions(1)
            .stats(true)
            .start();

        processor.add(doc("1")).unwrap();
        processor.add(doc("2")).unwrap();
        processor.flush();

        let stats = processor.stats();
        assert_eq!(stats.committed, 2);
        assert_eq!(stats.workers.len(), 2);
        for worker in &stats.workers {
            assert_eq!(worker.last_duration, Duration::from_millis(3));
        }
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn after_hook_can_add_while_flush_waits() {
        let transport = ScriptedTransport::new();
        transport.respond(200, ONE_CREATED);
        transport.respond(200, ONE_CREATED);
        let slot: Arc<OnceLock<Weak<BulkProcessor>>> = Arc::new(OnceLock::new());
        let added = Arc::new(Mutex::new(Vec::new()));

        let hook_slot = Arc::clone(&slot);
        let hook_added = Arc::clone(&added);
        let processor = Arc::new(
            transport
                .client()
                .bulk_processor()
                .after(move |id, _, _, _| {
                    if id != 1 {
                        return;
                    }
                    if let Some(processor) = hook_slot.get().and_then(Weak::upgrade) {
                        hook_added.lock().push(processor.add(doc("2")).is_ok());
                    }
                })
                .start(),
        );
        slot.set(Arc::downgrade(&processor)).unwrap();

        processor.add(doc("1")).unwrap();
        let (done_tx, done_rx) = mpsc::channel();
        let flusher = Arc::clone(&processor);
        let handle = thread::spawn(move || {
            flusher.flush();
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        handle.join().unwrap();
        assert_eq!(*added.lock(), vec![true]);

        // the action added from the hook goes out with the next flush
        processor.flush();
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn close_commits_remaining_actions() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"took":1,"errors":false,"items":[{"delete":{"_index":"t","_id":"9","status":200}}]}"#,
        );
        let processor = transport.client().bulk_processor().stats(true).start();
        processor.add(BulkDeleteRequest::new().index("t").id("9")).unwrap();
        processor.close();

        assert!(!processor.is_running());
        assert_eq!(processor.stats().deleted, 1);
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, "{\"delete\":{\"_id\":\"9\",\"_index\":\"t\"}}\n");
        assert!(processor.add(doc("x")).is_err());
    }

    #[test]
    fn retries_only_retryable_items() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"took":2,"errors":true,"items":[
                {"index":{"_index":"t","_id":"1","status":201}},
                {"index":{"_index":"t","_id":"2","status":429}}]}"#,
        );
        transport.respond(
            200,
            r#"{"took":1,"errors":false,"items":[{"index":{"_index":"t","_id":"2","status":201}}]}"#,
        );
        let errors = Arc::new(Mutex::new(Vec::new()));
        let after_errors = Arc::clone(&errors);
        let processor = transport
            .client()
            .bulk_processor()
            .backoff(ExponentialBackoff::new(Duration::from_millis(1), Duration::from_millis(100)))
            .after(move |_, reqs, _, err| after_errors.lock().push((reqs.len(), err.is_some())))
            .start();

        processor.add(doc("1")).unwrap();
        processor.add(doc("2")).unwrap();
        processor.flush();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let retried = requests[1].body.clone().unwrap();
        assert!(retried.contains("\"_id\":\"2\""));
        assert!(!retried.contains("\"_id\":\"1\""));
        assert_eq!(*errors.lock(), vec![(2, false)]);
    }

    #[test]
    fn gives_up_after_backoff_is_exhausted() {
        let transport = ScriptedTransport::new();
        transport.fail(TransportError::Connection("refused".into()));
        transport.fail(TransportError::Connection("refused".into()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let after_errors = Arc::clone(&errors);
        let processor = transport
            .client()
            .bulk_processor()
            .backoff(ExponentialBackoff::new(Duration::from_millis(1), Duration::from_millis(2)))
            .after(move |_, _, resp, err| {
                after_errors.lock().push((resp.is_some(), err.map(|e| e.to_string())))
            })
            .start();

        processor.add(doc("1")).unwrap();
        processor.flush();

        // one attempt plus one retry
        assert_eq!(transport.requests().len(), 2);
        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(!errors[0].0);
        assert!(errors[0].1.as_deref().unwrap().contains("refused"));
    }

    #[test]
    fn restart_resets_stats() {
        let transport = ScriptedTransport::new();
        transport.respond(200, ONE_CREATED);
        let processor = transport.client().bulk_processor().workers(0).stats(true).start();
        processor.add(doc("1")).unwrap();
        processor.close();
        assert_eq!(processor.stats().committed, 1);

        processor.start();
        assert!(processor.is_running());
        let stats = processor.stats();
        assert_eq!(stats.committed, 0);
        assert_eq!(stats.workers.len(), 1);
    }
}
