//! Logger handle
//!
//! A [`Logger`] is a cheap value bound to one registry [`Node`]. It carries two
//! instance-local things, an optional level override and a context map, that
//! are copied on every `with_*` derivation and never shared. The only
//! operations that touch shared state are [`Logger::set_level`] and
//! [`Logger::set_appender`], which act on the node and its whole subtree.

use super::{
    appender::SharedAppender,
    caller::Caller,
    log_context::{FieldValue, LogContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    registry::{path_segments, Node},
};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    node: Arc<Node>,
    /// Instance override; `Default` defers to the node
    level: LogLevel,
    context: LogContext,
}

impl Logger {
    pub(crate) fn new(node: Arc<Node>) -> Self {
        Self {
            node,
            level: LogLevel::Default,
            context: LogContext::new(),
        }
    }

    /// Handle for a child (or deeper path) of this logger's node.
    ///
    /// The new handle has no level override and no fields. A name without any
    /// non-empty segment returns a copy of this handle.
    #[must_use]
    pub fn derive(&self, name: &str) -> Logger {
        if path_segments(name).next().is_none() {
            return self.clone();
        }
        Logger::new(self.node.descendant(name))
    }

    /// Copy of this handle with its own level; the node is untouched.
    #[must_use]
    pub fn with_level(&self, level: LogLevel) -> Logger {
        Logger {
            level,
            ..self.clone()
        }
    }

    /// Copy of this handle with one more field.
    #[must_use]
    pub fn with<K, V>(&self, key: K, value: V) -> Logger
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Logger {
            context: self.context.clone().with_field(key, value),
            ..self.clone()
        }
    }

    /// Copy of this handle with every field of `context` added.
    #[must_use]
    pub fn with_context(&self, context: &LogContext) -> Logger {
        let mut merged = self.context.clone();
        merged.merge(context);
        Logger {
            context: merged,
            ..self.clone()
        }
    }

    /// Own override if set, else the node's current level.
    #[inline]
    pub fn effective_level(&self) -> LogLevel {
        if self.level.is_default() {
            self.node.level()
        } else {
            self.level
        }
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.passes(self.effective_level())
    }

    /// Set the level of this logger's name and every name below it.
    ///
    /// Clears this handle's own override, so the handle follows the node from
    /// now on. Other handles created with `with_level` keep their override.
    pub fn set_level(&mut self, level: LogLevel) {
        self.level = LogLevel::Default;
        self.node.set_level(level);
    }

    /// Install an appender on this logger's node and every node below it.
    pub fn set_appender(&self, appender: SharedAppender) {
        self.node.set_appender(appender);
    }

    /// Reinstall the built-in stderr appender on this subtree.
    pub fn clear_appender(&self) {
        self.node.clear_appender();
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn names(&self) -> &[String] {
        self.node.names()
    }

    pub fn path(&self) -> String {
        self.node.path()
    }

    /// The instance override (`Default` when the handle follows its node).
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(Caller::resolve(), level, message.into());
    }

    /// Formatted variant of [`log`](Self::log); the arguments are only
    /// rendered when the level passes.
    #[track_caller]
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(Caller::resolve(), level, args.to_string());
    }

    /// Log with an explicitly resolved caller, for helpers that relay records
    /// on behalf of a frame further up. Used by the logging macros.
    pub fn log_at(&self, caller: Caller, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(caller, level, args.to_string());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Error, args);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Info, args);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Debug, args);
    }

    /// Flush the appender of this logger's node.
    pub fn flush(&self) {
        if let Err(e) = self.node.appender().flush() {
            eprintln!("[LOGGER ERROR] Flush failed for '{}': {}", self.path(), e);
        }
    }

    fn dispatch(&self, caller: Caller, level: LogLevel, message: String) {
        let entry = LogEntry::new(level, message, self, caller);
        let appender = self.node.appender();
        Self::deliver(&appender, &entry, self.node.metrics());
    }

    /// Hand `entry` to `appender`, isolating the caller from its errors and
    /// panics.
    fn deliver(
        appender: &SharedAppender,
        entry: &LogEntry,
        metrics: &super::metrics::LoggerMetrics,
    ) {
        let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            appender.append(entry)
        }));

        match append_result {
            Ok(Ok(())) => {
                metrics.record_logged();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                metrics.record_dropped();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}",
                    appender.name(),
                    panic_msg
                );
                metrics.record_dropped();
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path())
            .field("level", &self.level)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::{Appender, LoggerError, Registry, Result};

    fn setup() -> (Registry, Arc<MemoryAppender>) {
        let memory = Arc::new(MemoryAppender::new());
        let registry = Registry::builder().shared_appender(memory.clone()).build();
        (registry, memory)
    }

    #[test]
    fn test_default_is_error_only() {
        let (registry, memory) = setup();
        let log = registry.named("lib");
        log.debug("d");
        log.info("i");
        log.error("e");

        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
    }

    #[test]
    fn test_with_level_is_instance_scoped() {
        let (registry, memory) = setup();
        let log = registry.named("lib");
        let verbose = log.with_level(LogLevel::Debug);

        verbose.debug("shown");
        log.debug("hidden");
        assert_eq!(memory.len(), 1);
        assert_eq!(registry.node("lib").level(), LogLevel::Error);
        assert_eq!(verbose.level(), LogLevel::Debug);
    }

    #[test]
    fn test_override_survives_node_changes() {
        let (registry, _memory) = setup();
        let quiet = registry.named("lib").with_level(LogLevel::Error);
        registry.named("lib").set_level(LogLevel::Debug);

        assert_eq!(quiet.effective_level(), LogLevel::Error);
        assert_eq!(registry.named("lib").effective_level(), LogLevel::Debug);
    }

    #[test]
    fn test_set_level_clears_override() {
        let (registry, _memory) = setup();
        let mut log = registry.named("lib").with_level(LogLevel::Debug);
        log.set_level(LogLevel::Info);

        assert_eq!(log.level(), LogLevel::Default);
        assert_eq!(log.effective_level(), LogLevel::Info);
        assert_eq!(registry.node("lib").level(), LogLevel::Info);
    }

    #[test]
    fn test_with_does_not_touch_original() {
        let (registry, memory) = setup();
        let log = registry.named("lib");
        let tagged = log.with("email", "a@b.c");

        log.error("plain");
        tagged.error("tagged");

        let entries = memory.entries();
        assert!(entries[0].context.is_empty());
        assert_eq!(
            entries[1].context.get("email"),
            Some(&FieldValue::String("a@b.c".into()))
        );
        assert!(log.context().is_empty());
    }

    #[test]
    fn test_derive() {
        let (registry, _memory) = setup();
        let net = registry.named("net").with("conn", 1).with_level(LogLevel::Debug);
        let peer = net.derive("peer");

        assert_eq!(peer.path(), "net/peer");
        assert_eq!(peer.name(), "peer");
        assert_eq!(peer.level(), LogLevel::Default);
        assert!(peer.context().is_empty());
        assert!(Arc::ptr_eq(peer.node(), &registry.node("net/peer")));

        let same = net.derive("");
        assert!(Arc::ptr_eq(same.node(), net.node()));
        assert_eq!(same.level(), LogLevel::Debug);
        assert_eq!(same.context().len(), 1);
    }

    #[test]
    fn test_with_context_merges() {
        let (registry, _memory) = setup();
        let ctx = LogContext::new().with_field("a", 1).with_field("b", 2);
        let log = registry.named("x").with("a", 0).with_context(&ctx);
        assert_eq!(log.context().get("a"), Some(&FieldValue::Int(1)));
        assert_eq!(log.context().len(), 2);
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (registry, memory) = setup();
        let log = registry.named("x");

        let line = line!() + 1;
        log.error("here");
        let line_fmt = line!() + 1;
        log.errorf(format_args!("n={}", 3));

        let entries = memory.entries();
        assert_eq!(entries[0].caller.file(), file!());
        assert_eq!(entries[0].caller.line(), Some(line));
        assert_eq!(entries[1].caller.line(), Some(line_fmt));
        assert_eq!(entries[1].message, "n=3");
    }

    #[test]
    fn test_default_level_messages_are_never_emitted() {
        let (registry, memory) = setup();
        let log = registry.named("x").with_level(LogLevel::Debug);
        log.log(LogLevel::Default, "nothing");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_filtered_format_is_not_rendered() {
        struct Loud;
        impl fmt::Display for Loud {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                panic!("rendered a filtered message");
            }
        }

        let (registry, memory) = setup();
        registry.named("x").debugf(format_args!("{}", Loud));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_appender_failure_is_contained() {
        struct Failing;
        impl Appender for Failing {
            fn append(&self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::other("Simulated failure"))
            }
            fn name(&self) -> &str {
                "failing"
            }
        }

        struct Panicking;
        impl Appender for Panicking {
            fn append(&self, _entry: &LogEntry) -> Result<()> {
                panic!("boom");
            }
            fn name(&self) -> &str {
                "panicking"
            }
        }

        let registry = Registry::builder().appender(Failing).build();
        let log = registry.named("x");
        log.error("one");
        log.error("two");
        assert_eq!(registry.metrics().dropped_count(), 2);

        log.set_appender(Arc::new(Panicking));
        log.error("three");
        assert_eq!(registry.metrics().dropped_count(), 3);
        assert_eq!(registry.metrics().total_logged(), 0);
    }
}
