//! File appender implementation

use super::stream::StreamAppender;
use crate::core::{Appender, Encoder, LogEntry, LoggerError, Result};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Appends text lines to a file, creating it if needed.
pub struct FileAppender {
    path: PathBuf,
    stream: StreamAppender,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            stream: StreamAppender::new(BufWriter::new(file)).with_name("file"),
            path,
        })
    }

    /// Replace the default text encoder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_named_logger::appenders::FileAppender;
    /// use rust_named_logger::{LineEncoder, OutputFormat, TimestampFormat};
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_encoder(
    ///         LineEncoder::new(OutputFormat::Json).with_timestamp_format(TimestampFormat::Rfc3339),
    ///     );
    /// ```
    #[must_use]
    pub fn with_encoder<E: Encoder + 'static>(mut self, encoder: E) -> Self {
        self.stream.set_encoder(encoder);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        self.stream.append(entry)
    }

    fn flush(&self) -> Result<()> {
        self.stream.flush()
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
