//! Delivery counters
//!
//! Every registry owns one [`LoggerMetrics`] shared by all of its nodes; a
//! [`BackgroundAppender`](crate::appenders::BackgroundAppender) keeps its own
//! for queue statistics.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters describing what happened to emitted records.
///
/// # Example
///
/// ```
/// use rust_named_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_dropped();
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.total_logged, 1);
/// assert_eq!(snapshot.dropped_count, 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records an appender accepted
    total_logged: AtomicU64,

    /// Records lost to an appender error, panic or full queue
    dropped_count: AtomicU64,

    /// Times a background queue was found full
    queue_full_events: AtomicU64,

    /// Times a caller waited for queue space
    block_events: AtomicU64,

    /// Error records written synchronously because the queue was full
    critical_logs_preserved: AtomicU64,
}

/// Point-in-time copy of [`LoggerMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_logged: u64,
    pub dropped_count: u64,
    pub queue_full_events: u64,
    pub block_events: u64,
    pub critical_logs_preserved: u64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            critical_logs_preserved: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn critical_logs_preserved(&self) -> u64 {
        self.critical_logs_preserved.load(Ordering::Relaxed)
    }

    /// Returns the previous value, like the other `record_*` methods.
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_critical_preserved(&self) -> u64 {
        self.critical_logs_preserved.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage (0.0 - 100.0) of records that never reached a sink.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_logged: self.total_logged(),
            dropped_count: self.dropped_count(),
            queue_full_events: self.queue_full_events(),
            block_events: self.block_events(),
            critical_logs_preserved: self.critical_logs_preserved(),
        }
    }

    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.critical_logs_preserved.store(0, Ordering::Relaxed);
    }
}
