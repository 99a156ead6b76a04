//! Per-file and per-line level gate in front of another appender
//!
//! A [`CodeWriter`] filters on where a record was logged from rather than on
//! which logger it came through. Lookups happen on every record; updates are
//! rare, so the tables sit behind one `RwLock`.

use super::{
    appender::{Appender, SharedAppender},
    error::Result,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Levels configured for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLevel {
    /// `Default` when the entry only exists to hold line overrides
    pub level: LogLevel,
    pub line_levels: BTreeMap<u32, LogLevel>,
}

/// Appender that forwards only records allowed by its level tables.
///
/// Precedence, most specific first: line entry, file entry, global level.
///
/// # Example
///
/// ```
/// use rust_named_logger::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryAppender::new());
/// let writer = Arc::new(CodeWriter::new(memory.clone(), LogLevel::Info));
/// writer.set_file_level(file!(), LogLevel::Debug);
///
/// let registry = Registry::builder()
///     .level(LogLevel::Debug)
///     .shared_appender(writer)
///     .build();
/// registry.named("app").debug("kept: this file is at DEBUG");
/// assert_eq!(memory.len(), 1);
/// ```
pub struct CodeWriter {
    inner: SharedAppender,
    level: RwLock<LogLevel>,
    files: RwLock<HashMap<String, FileLevel>>,
}

impl CodeWriter {
    pub fn new(inner: SharedAppender, level: LogLevel) -> Self {
        Self {
            inner,
            level: RwLock::new(level),
            files: RwLock::new(HashMap::new()),
        }
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    /// Set the level of every record from `file`.
    ///
    /// `Default` removes the file and all of its line entries.
    pub fn set_file_level(&self, file: &str, level: LogLevel) {
        if file.is_empty() {
            return;
        }
        let mut files = self.files.write();
        if level.is_default() {
            files.remove(file);
        } else {
            files.entry(file.to_string()).or_default().level = level;
        }
    }

    /// Set the level of records from one line of `file`.
    ///
    /// `Default` removes the line entry, and the file entry too once it holds
    /// nothing.
    pub fn set_file_line_level(&self, file: &str, line: u32, level: LogLevel) {
        if file.is_empty() || line == 0 {
            return;
        }
        let mut files = self.files.write();
        if !level.is_default() {
            files
                .entry(file.to_string())
                .or_default()
                .line_levels
                .insert(line, level);
            return;
        }

        if let Some(entry) = files.get_mut(file) {
            entry.line_levels.remove(&line);
            if entry.line_levels.is_empty() && entry.level.is_default() {
                files.remove(file);
            }
        }
    }

    pub fn file_level(&self, file: &str) -> Option<FileLevel> {
        self.files.read().get(file).cloned()
    }

    pub fn file_levels(&self) -> BTreeMap<String, FileLevel> {
        self.files
            .read()
            .iter()
            .map(|(file, level)| (file.clone(), level.clone()))
            .collect()
    }

    /// Threshold that applies to a record from `file` at `line`.
    fn threshold(&self, file: &str, line: Option<u32>) -> LogLevel {
        let global = self.level();
        let files = self.files.read();
        let Some(entry) = files.get(file) else {
            return global;
        };
        // a file entry kept only for its line overrides lets every other
        // line of that file through
        match line.and_then(|line| entry.line_levels.get(&line)) {
            Some(level) => *level,
            None => entry.level,
        }
    }

    pub fn allows(&self, entry: &LogEntry) -> bool {
        entry
            .level
            .passes(self.threshold(entry.caller.file_key(), entry.caller.line()))
    }
}

impl Appender for CodeWriter {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        if !self.allows(entry) {
            return Ok(());
        }
        self.inner.append(entry)
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        "code_writer"
    }
}
