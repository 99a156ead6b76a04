//! Per-file and per-line filtering
//!
//! A `CodeWriter` in front of the console lets one noisy line or file be
//! silenced (or one quiet spot be opened up) without touching logger names.
//!
//! Run with: cargo run --example code_writer

use rust_named_logger::prelude::*;
use std::sync::Arc;

fn poll(log: &Logger, round: u32) {
    log.debugf(format_args!("poll round {}", round));
    log.info("poll finished");
}

fn main() {
    let writer = Arc::new(CodeWriter::new(
        Arc::new(ConsoleAppender::new()),
        LogLevel::Debug,
    ));
    let registry = Registry::builder()
        .level(LogLevel::Debug)
        .shared_appender(writer.clone())
        .build();
    let log = registry.named("worker");

    println!("--- everything passes");
    poll(&log, 1);

    println!("--- this file limited to INFO");
    writer.set_file_level(file!(), LogLevel::Info);
    poll(&log, 2);

    println!("--- the debug line inside poll() re-enabled");
    writer.set_file_line_level(file!(), 12, LogLevel::Debug);
    poll(&log, 3);

    println!("--- overrides removed");
    writer.set_file_line_level(file!(), 12, LogLevel::Default);
    writer.set_file_level(file!(), LogLevel::Default);
    assert!(writer.file_levels().is_empty());
    poll(&log, 4);
}
