//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod code_writer;
pub mod config;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod registry;
pub mod timestamp;

pub use appender::{Appender, SharedAppender};
pub use caller::{Caller, CallerDisplay, CallerStyle};
pub use code_writer::{CodeWriter, FileLevel};
pub use config::{LoggingConfig, DEFAULT_ENV_VAR};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{LogEntry, LoggerId, LINE_SEPARATOR};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use output_format::{Encoder, LineEncoder, OutputFormat};
pub use registry::{
    all, named, set_global_appender, set_global_level, Node, NodeSnapshot, Registry,
    RegistryBuilder, DEFAULT_ROOT_LEVEL,
};
pub use timestamp::TimestampFormat;
