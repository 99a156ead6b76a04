//! # Rust Named Logger
//!
//! Hierarchical named loggers for applications and the libraries they use.
//!
//! ## Features
//!
//! - **Named hierarchy**: loggers are addressed by `/`-separated paths such as
//!   `net/peer`; levels and appenders set on a name apply to everything below it
//! - **Quiet libraries**: every logger starts at `ERROR` until the application
//!   opts in for the parts it cares about
//! - **Cheap handles**: per-handle level overrides and context fields never
//!   affect other handles
//! - **Caller attribution**: every record carries the file, line and function
//!   of the application code that logged it
//! - **Source-level filtering**: [`CodeWriter`] raises or lowers levels per
//!   file and per line
//!
//! ## Example
//!
//! ```
//! use rust_named_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryAppender::new());
//! let registry = Registry::builder().shared_appender(memory.clone()).build();
//!
//! // A library asks for its logger by name
//! let peers = registry.named("net/peer");
//! peers.info("not shown: libraries default to ERROR");
//!
//! // The application turns on the subtree it is debugging
//! registry.named("net").set_level(LogLevel::Info);
//! peers.with("addr", "10.0.0.7").info("handshake done");
//!
//! assert_eq!(memory.messages(), ["handshake done"]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        BackgroundAppender, ConsoleAppender, FileAppender, MemoryAppender, OverflowPolicy,
        StreamAppender,
    };
    pub use crate::core::{
        Appender, Caller, CallerStyle, CodeWriter, FieldValue, LogContext, LogEntry, LogLevel,
        Logger, LoggerError, LoggingConfig, OutputFormat, Registry, Result, SharedAppender,
        TimestampFormat,
    };
}

pub use appenders::{
    BackgroundAppender, ConsoleAppender, FileAppender, MemoryAppender, OverflowPolicy,
    StreamAppender,
};
pub use core::{
    all, named, set_global_appender, set_global_level, Appender, Caller, CallerDisplay,
    CallerStyle, CodeWriter, Encoder, FieldValue, FileLevel, LineEncoder, LogContext, LogEntry,
    LogLevel, Logger, LoggerError, LoggerId, LoggerMetrics, LoggingConfig, MetricsSnapshot, Node,
    NodeSnapshot, OutputFormat, Registry, RegistryBuilder, Result, SharedAppender,
    TimestampFormat, DEFAULT_ROOT_LEVEL,
};
