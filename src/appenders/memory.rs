//! In-memory appender

use crate::core::{Appender, LogEntry, Result};
use parking_lot::Mutex;

/// Keeps every record it receives. Meant for tests and diagnostics.
#[derive(Debug, Default)]
pub struct MemoryAppender {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Remove and return everything received so far.
    pub fn take(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Registry;
    use std::sync::Arc;

    #[test]
    fn test_collects_and_takes() {
        let memory = Arc::new(MemoryAppender::new());
        let registry = Registry::builder().shared_appender(memory.clone()).build();
        let log = registry.named("m");
        log.error("one");
        log.error("two");

        assert_eq!(memory.messages(), ["one", "two"]);
        assert_eq!(memory.take().len(), 2);
        assert!(memory.is_empty());

        log.error("three");
        memory.clear();
        assert_eq!(memory.len(), 0);
    }

    #[test]
    fn test_stored_records_release_the_tree() {
        let memory = Arc::new(MemoryAppender::new());
        {
            let registry = Registry::builder().shared_appender(memory.clone()).build();
            let log = registry.named("net/peer").with("conn", 3);
            log.error("kept after the registry is gone");
            assert!(Arc::strong_count(&memory) > 1);
        }

        assert_eq!(Arc::strong_count(&memory), 1);
        let entries = memory.entries();
        assert_eq!(entries[0].logger_path(), "net/peer");
        assert_eq!(entries[0].context.len(), 1);
    }
}
