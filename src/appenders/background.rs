//! Appender that hands records to a worker thread
//!
//! Logging callers only pay for a channel send; the wrapped appender runs on
//! the worker. When the bounded queue is full the [`OverflowPolicy`] decides
//! what happens, except for `ERROR` records, which are never dropped: they are
//! written synchronously instead.

use crate::core::{Appender, LogEntry, LogLevel, LoggerError, LoggerMetrics, Result, SharedAppender};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Queue capacity used by [`BackgroundAppender::new`].
pub const DEFAULT_CAPACITY: usize = 8192;

/// How long dropping the appender waits for the worker to drain.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const BATCH_SIZE: usize = 50;

/// Policy for handling a full queue
///
/// # Example
///
/// ```
/// use rust_named_logger::appenders::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// assert_eq!(policy.to_string(), "BlockWithTimeout(100ms)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the new record, count it, and warn on stderr now and then
    #[default]
    DropNewest,

    /// Wait until the worker makes room
    ///
    /// Slow sinks then slow down every caller logging through this appender.
    Block,

    /// Wait up to the given duration, then drop
    BlockWithTimeout(Duration),
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
        }
    }
}

enum Message {
    Entry(LogEntry),
    Flush(Sender<()>),
}

pub struct BackgroundAppender {
    inner: SharedAppender,
    sender: Option<Sender<Message>>,
    worker: Option<thread::JoinHandle<()>>,
    policy: OverflowPolicy,
    metrics: Arc<LoggerMetrics>,
}

impl BackgroundAppender {
    pub fn new(inner: SharedAppender) -> Self {
        Self::with_config(inner, DEFAULT_CAPACITY, OverflowPolicy::default())
    }

    pub fn with_config(inner: SharedAppender, capacity: usize, policy: OverflowPolicy) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        let metrics = Arc::new(LoggerMetrics::new());

        let worker_inner = Arc::clone(&inner);
        let worker_metrics = Arc::clone(&metrics);
        let worker = thread::Builder::new()
            .name("named-logger-background".to_string())
            .spawn(move || Self::run(receiver, worker_inner, worker_metrics))
            .map_err(|e| eprintln!("[LOGGER ERROR] Failed to spawn background worker: {}", e))
            .ok();

        Self {
            inner,
            // without a worker every record goes straight to the inner appender
            sender: worker.as_ref().map(|_| sender),
            worker,
            policy,
            metrics,
        }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn run(receiver: Receiver<Message>, inner: SharedAppender, metrics: Arc<LoggerMetrics>) {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        while let Ok(message) = receiver.recv() {
            let mut flush_ack = None;
            match message {
                Message::Entry(entry) => batch.push(entry),
                Message::Flush(ack) => flush_ack = Some(ack),
            }

            // Collect more entries without blocking, stopping at a flush
            while flush_ack.is_none() && batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(Message::Entry(entry)) => batch.push(entry),
                    Ok(Message::Flush(ack)) => flush_ack = Some(ack),
                    Err(_) => break,
                }
            }

            Self::process_batch(&inner, &batch, &metrics);
            batch.clear();

            if let Some(ack) = flush_ack {
                Self::flush_inner(&inner);
                let _ = ack.send(());
            }
        }

        // Channel closed: everything queued has been processed
        Self::flush_inner(&inner);
    }

    fn process_batch(inner: &SharedAppender, batch: &[LogEntry], metrics: &LoggerMetrics) {
        for entry in batch {
            Self::write(inner, entry, metrics);
        }
    }

    fn write(inner: &SharedAppender, entry: &LogEntry, metrics: &LoggerMetrics) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| inner.append(entry)));
        match result {
            Ok(Ok(())) => {
                metrics.record_logged();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", inner.name(), e);
                metrics.record_dropped();
            }
            Err(_) => {
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked on the background worker",
                    inner.name()
                );
                metrics.record_dropped();
            }
        }
    }

    fn flush_inner(inner: &SharedAppender) {
        if let Err(e) = inner.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush '{}': {}", inner.name(), e);
        }
    }

    fn handle_overflow(&self, sender: &Sender<Message>, entry: LogEntry) -> Result<()> {
        self.metrics.record_queue_full();

        if entry.level == LogLevel::Error {
            self.metrics.record_critical_preserved();
            Self::write(&self.inner, &entry, &self.metrics);
            return Ok(());
        }

        match self.policy {
            OverflowPolicy::DropNewest => {
                self.alert_and_drop();
                Ok(())
            }
            OverflowPolicy::Block => {
                self.metrics.record_block();
                sender
                    .send(Message::Entry(entry))
                    .map_err(|_| LoggerError::ChannelSendError)
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match sender.send_timeout(Message::Entry(entry), timeout) {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(_)) => {
                        self.alert_and_drop();
                        Ok(())
                    }
                    Err(SendTimeoutError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
                }
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        if dropped_count % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Background queue full, {} logs dropped. \
                 Consider increasing capacity or using a blocking overflow policy.",
                dropped_count + 1
            );
        }
    }
}

impl Appender for BackgroundAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let Some(sender) = &self.sender else {
            Self::write(&self.inner, entry, &self.metrics);
            return Ok(());
        };

        match sender.try_send(Message::Entry(entry.clone())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(Message::Entry(entry))) => self.handle_overflow(sender, entry),
            Err(TrySendError::Full(Message::Flush(_))) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::ChannelSendError),
        }
    }

    /// Wait until every record queued before this call has reached the inner
    /// appender, then flush it.
    fn flush(&self) -> Result<()> {
        let Some(sender) = &self.sender else {
            return self.inner.flush();
        };

        let (ack, done) = bounded(1);
        sender
            .send(Message::Flush(ack))
            .map_err(|_| LoggerError::ChannelSendError)?;
        done.recv().map_err(|_| LoggerError::ChannelSendError)
    }

    fn name(&self) -> &str {
        "background"
    }
}

impl Drop for BackgroundAppender {
    fn drop(&mut self) {
        // Close the channel so the worker drains the queue and exits
        drop(self.sender.take());

        if let Some(handle) = self.worker.take() {
            // released by the worker itself: it exits once this returns
            if handle.thread().id() == thread::current().id() {
                return;
            }

            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Background worker panicked during shutdown: {:?}", e);
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Background worker did not finish within {:?} timeout. \
                         Some logs may be lost.",
                        DEFAULT_SHUTDOWN_TIMEOUT
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Background appender shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}
