//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};
use std::sync::Arc;

/// Destination of emitted records.
///
/// Appenders are shared between every node of a subtree, so they take `&self`
/// and guard their own state. `append` must not block indefinitely: every
/// caller logging through the same node waits on it. Errors are reported to
/// the logger, which counts them and never hands them back to application code.
pub trait Appender: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Appender shared between registry nodes.
pub type SharedAppender = Arc<dyn Appender>;
