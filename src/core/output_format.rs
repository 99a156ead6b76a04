//! Output format configuration for log entries
//!
//! Provides different output formats for log entries:
//! - Text: the human-readable line layout (default)
//! - Json: one JSON object per record
//! - Logfmt: key=value pairs for log aggregation tools

use super::caller::Caller;
use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Turns a record into bytes. Implementations are pure.
pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &LogEntry) -> Vec<u8>;
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `2025-01-08 10:30:45.123  INFO          server.rs(   42) : listening port=80`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08 10:30:45.123","level":"INFO","logger":"net","message":"listening"}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp="2025-01-08 10:30:45.123" level=INFO logger=net message="listening"`
    Logfmt,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => self.format_text(entry, timestamp_format),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
            OutputFormat::Logfmt => self.format_logfmt(entry, timestamp_format),
        }
    }

    /// `{timestamp} {level:>5} {caller:25} : {message}[ {fields}]`
    fn format_text(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        Self::text_line(
            &timestamp_format.format(&entry.timestamp),
            &format!("{:>5.5}", entry.level),
            &entry.caller,
            entry,
        )
    }

    /// Text layout with a pre-rendered level column, so the console appender
    /// can colour it without duplicating the layout.
    pub(crate) fn text_line(
        timestamp: &str,
        level: &str,
        caller: &Caller,
        entry: &LogEntry,
    ) -> String {
        let mut line = format!("{} {} {:25.5} : {}", timestamp, level, caller, entry.message);
        if !entry.context.is_empty() {
            line.push(' ');
            line.push_str(&entry.context.to_string());
        }
        line
    }

    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            Self::format_timestamp_json(entry, timestamp_format),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "logger".to_string(),
            serde_json::Value::String(entry.logger_path().to_string()),
        );

        if !entry.caller.is_unknown() {
            json_obj.insert(
                "file".to_string(),
                serde_json::Value::String(entry.caller.file().to_string()),
            );
            if let Some(line) = entry.caller.line() {
                json_obj.insert("line".to_string(), serde_json::Value::Number(line.into()));
            }
            if !entry.caller.qualified_function().is_empty() {
                json_obj.insert(
                    "function".to_string(),
                    serde_json::Value::String(entry.caller.qualified_function().to_string()),
                );
            }
        }

        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        // Context fields never overwrite the record's own keys
        for (key, value) in entry.context.fields() {
            json_obj
                .entry(key.clone())
                .or_insert_with(|| value.to_json_value());
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    fn format_timestamp_json(
        entry: &LogEntry,
        timestamp_format: &TimestampFormat,
    ) -> serde_json::Value {
        match timestamp_format {
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
            }
            _ => serde_json::Value::String(timestamp_format.format(&entry.timestamp)),
        }
    }

    fn format_logfmt(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut parts = Vec::new();

        parts.push(format!(
            "timestamp={}",
            escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
        ));
        parts.push(format!("level={}", entry.level.to_str()));
        parts.push(format!("logger={}", escape_logfmt_value(entry.logger_path())));

        if !entry.caller.is_unknown() {
            parts.push(format!("caller={}", escape_logfmt_value(&entry.caller.to_string())));
        }

        // Message is always quoted
        parts.push(format!("message={}", quote_logfmt_value(&entry.message)));

        for (key, value) in entry.context.fields() {
            let formatted_value = match value {
                FieldValue::String(s) | FieldValue::Rendered(s) => quote_logfmt_value(s),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
        }

        parts.join(" ")
    }
}

/// Strip everything but alphanumerics, `_` and `-` from a logfmt key.
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Quote a logfmt value only when it needs it.
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains(|c: char| c == ' ' || c == '"' || c == '=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// [`Encoder`] that renders one [`OutputFormat`] line per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEncoder {
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
}

impl LineEncoder {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            timestamp_format: TimestampFormat::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }
}

impl Encoder for LineEncoder {
    fn encode(&self, entry: &LogEntry) -> Vec<u8> {
        self.format.format(entry, &self.timestamp_format).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Caller, LogLevel, Registry};
    use chrono::{Local, TimeZone};

    fn entry(level: LogLevel, message: &str, fields: &[(&str, i64)]) -> LogEntry {
        let mut logger = Registry::new().named("net/peer");
        for (key, value) in fields {
            logger = logger.with(*key, *value);
        }
        let timestamp = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(7);
        LogEntry::new(
            level,
            message.to_string(),
            &logger,
            Caller::new("src/net/peer.rs", 42, "app::net::peer::connect"),
        )
        .with_timestamp(timestamp)
    }

    #[test]
    fn test_text_format_exact() {
        let e = entry(LogLevel::Info, "connected", &[]);
        let result = OutputFormat::Text.format(&e, &TimestampFormat::Local);
        assert_eq!(
            result,
            "2025-01-08 10:30:45.007  INFO            peer.rs(   42) : connected"
        );
    }

    #[test]
    fn test_text_format_with_context() {
        let e = entry(LogLevel::Debug, "sent", &[("bytes", 12), ("attempt", 2)]);
        let result = OutputFormat::Text.format(&e, &TimestampFormat::Local);
        assert!(result.ends_with(" : sent {attempt=2 bytes=12}"), "{}", result);
        assert!(result.contains("DEBUG"));
    }

    #[test]
    fn test_text_caller_keeps_tail() {
        let logger = Registry::new().named("x");
        let e = LogEntry::new(
            LogLevel::Error,
            "boom".into(),
            &logger,
            Caller::new("a_really_long_source_file_name.rs", 7, ""),
        );
        let result = OutputFormat::Text.format(&e, &TimestampFormat::Local);
        assert!(result.contains("ERROR ource_file_name.rs(    7) : boom"), "{}", result);
    }

    #[test]
    fn test_json_format() {
        let e = entry(LogLevel::Error, "Error occurred", &[("code", 500)]);
        let result = OutputFormat::Json.format(&e, &TimestampFormat::Local);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "Error occurred");
        assert_eq!(parsed["logger"], "net/peer");
        assert_eq!(parsed["line"], 42);
        assert_eq!(parsed["function"], "app::net::peer::connect");
        assert_eq!(parsed["code"], 500);
    }

    #[test]
    fn test_json_unix_millis_is_number() {
        let e = entry(LogLevel::Info, "x", &[]);
        let result = OutputFormat::Json.format(&e, &TimestampFormat::UnixMillis);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(parsed["timestamp"].is_number());
    }

    #[test]
    fn test_logfmt_format() {
        let e = entry(LogLevel::Info, "Warning message", &[("count", 5)]);
        let result = OutputFormat::Logfmt.format(&e, &TimestampFormat::Local);

        assert!(result.contains("level=INFO"));
        assert!(result.contains("logger=net/peer"));
        assert!(result.contains("caller=peer.rs(42)"));
        assert!(result.contains("message=\"Warning message\""));
        assert!(result.contains("count=5"));
        assert!(result.starts_with("timestamp=\"2025-01-08 10:30:45.007\""));
    }

    #[test]
    fn test_line_encoder() {
        let e = entry(LogLevel::Info, "hello", &[]);
        let bytes = LineEncoder::new(OutputFormat::Logfmt).encode(&e);
        assert!(String::from_utf8(bytes).unwrap().contains("message=\"hello\""));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }
}
