//! Log entry structure

use super::caller::Caller;
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::logger::Logger;
use chrono::{DateTime, Local};

/// Separator that replaces embedded newlines so a record stays on one line.
pub const LINE_SEPARATOR: &str = "; ";

/// Identity of the handle a record was logged through.
///
/// Holds no reference into the registry: a stored record never keeps a node
/// or its appender alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerId {
    /// Full path, e.g. `net/peer`; empty for the root
    pub path: String,
    /// The handle's own override (`Default` when it followed its node)
    pub level: LogLevel,
}

impl LoggerId {
    pub fn of(logger: &Logger) -> Self {
        Self {
            path: logger.path(),
            level: logger.level(),
        }
    }

    /// Last path segment; empty for the root.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// One emitted log event, immutable once built.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// Snapshot of the handle's fields at the time of the call
    pub context: LogContext,
    /// The handle the record was logged through
    pub logger: LoggerId,
    pub caller: Caller,
}

impl LogEntry {
    /// Collapse line breaks so one record is one physical line.
    fn sanitize_message(message: String) -> String {
        if !message.contains(|c: char| c == '\n' || c == '\r') {
            return message;
        }
        message
            .replace("\r\n", LINE_SEPARATOR)
            .replace('\n', LINE_SEPARATOR)
            .replace('\r', "")
    }

    pub fn new(level: LogLevel, message: String, logger: &Logger, caller: Caller) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: Self::sanitize_message(message),
            context: logger.context().clone(),
            logger: LoggerId::of(logger),
            caller,
        }
    }

    /// Path of the originating logger, e.g. `net/peer`.
    pub fn logger_path(&self) -> &str {
        &self.logger.path
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Registry;

    #[test]
    fn test_newlines_collapsed() {
        let logger = Registry::new().named("app");
        let entry = LogEntry::new(
            LogLevel::Info,
            "first\nsecond\r\nthird\r".to_string(),
            &logger,
            Caller::unknown(),
        );
        assert_eq!(entry.message, "first; second; third");
    }

    #[test]
    fn test_context_snapshot() {
        let logger = Registry::new().named("app").with("user", "alice");
        let entry = LogEntry::new(LogLevel::Error, "x".into(), &logger, Caller::unknown());

        assert_eq!(entry.context.len(), 1);
        assert_eq!(entry.logger_path(), "app");
        assert!(entry.caller.is_unknown());
    }

    #[test]
    fn test_logger_identity() {
        let registry = Registry::new();
        let logger = registry.named("net/peer").with_level(LogLevel::Debug);
        let entry = LogEntry::new(LogLevel::Debug, "x".into(), &logger, Caller::unknown());

        assert_eq!(
            entry.logger,
            LoggerId {
                path: "net/peer".to_string(),
                level: LogLevel::Debug,
            }
        );
        assert_eq!(entry.logger.name(), "peer");

        let root = LogEntry::new(LogLevel::Error, "x".into(), &registry.named(""), Caller::unknown());
        assert_eq!(root.logger.name(), "");

        // the record does not pin the node
        let node = registry.node("net/peer");
        let before = std::sync::Arc::strong_count(&node);
        let _kept = entry.clone();
        assert_eq!(std::sync::Arc::strong_count(&node), before);
    }
}
