//! Appender over any byte sink

use crate::core::{Appender, Encoder, LineEncoder, LogEntry, Result};
use parking_lot::Mutex;
use std::io::Write;

/// Encodes each record and writes it to a `Write` sink as exactly one line.
///
/// Newlines an encoder lets through are replaced with `;`.
///
/// # Example
///
/// ```
/// use rust_named_logger::appenders::StreamAppender;
/// use rust_named_logger::{LineEncoder, OutputFormat};
///
/// let appender = StreamAppender::new(std::io::stdout())
///     .with_encoder(LineEncoder::new(OutputFormat::Logfmt));
/// ```
pub struct StreamAppender {
    name: String,
    writer: Mutex<Box<dyn Write + Send>>,
    encoder: Box<dyn Encoder>,
}

impl StreamAppender {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            name: "stream".to_string(),
            writer: Mutex::new(Box::new(writer)),
            encoder: Box::new(LineEncoder::default()),
        }
    }

    #[must_use]
    pub fn with_encoder<E: Encoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn set_encoder<E: Encoder + 'static>(&mut self, encoder: E) {
        self.encoder = Box::new(encoder);
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn encode_line(&self, entry: &LogEntry) -> Vec<u8> {
        let mut line = self.encoder.encode(entry);
        for byte in line.iter_mut() {
            if *byte == b'\n' {
                *byte = b';';
            }
        }
        line.push(b'\n');
        line
    }
}

impl Appender for StreamAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = self.encode_line(entry);
        self.writer.lock().write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
