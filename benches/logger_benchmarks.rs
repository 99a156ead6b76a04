//! Criterion benchmarks for rust_named_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_named_logger::prelude::*;
use rust_named_logger::{Encoder, LineEncoder};
use std::io::sink;
use std::sync::Arc;

fn sink_registry(level: LogLevel) -> Registry {
    Registry::builder()
        .level(level)
        .appender(StreamAppender::new(sink()))
        .build()
}

// ============================================================================
// Handle Creation Benchmarks
// ============================================================================

fn bench_handle_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_creation");
    group.throughput(Throughput::Elements(1));

    let registry = sink_registry(LogLevel::Error);
    registry.node("net/peer/wire");

    group.bench_function("named_existing", |b| {
        b.iter(|| black_box(registry.named(black_box("net/peer/wire"))));
    });

    let logger = registry.named("net");
    group.bench_function("derive_existing", |b| {
        b.iter(|| black_box(logger.derive(black_box("peer"))));
    });

    group.bench_function("with_field", |b| {
        b.iter(|| black_box(logger.with("conn", black_box(42))));
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let registry = sink_registry(LogLevel::Error);
    let logger = registry.named("quiet");

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("dropped")));
    });

    group.bench_function("filtered_debugf", |b| {
        b.iter(|| logger.debugf(format_args!("dropped {}", black_box(7))));
    });

    group.bench_function("filtered_macro", |b| {
        b.iter(|| rust_named_logger::debug!(logger, "dropped {}", black_box(7)));
    });

    group.finish();
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    let registry = sink_registry(LogLevel::Debug);
    let logger = registry.named("loud");
    let with_fields = logger.with("user", "alice").with("attempt", 3);

    group.bench_function("info_text", |b| {
        b.iter(|| logger.info(black_box("message")));
    });

    group.bench_function("info_text_with_fields", |b| {
        b.iter(|| with_fields.info(black_box("message")));
    });

    let writer = Arc::new(CodeWriter::new(Arc::new(StreamAppender::new(sink())), LogLevel::Info));
    writer.set_file_level(file!(), LogLevel::Error);
    let gated = Registry::builder()
        .level(LogLevel::Debug)
        .shared_appender(writer)
        .build()
        .named("gated");
    group.bench_function("code_writer_rejects", |b| {
        b.iter(|| gated.info(black_box("rejected by file level")));
    });

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    let logger = Registry::new().named("net/peer").with("bytes", 512);
    let entry = LogEntry::new(
        LogLevel::Info,
        "frame received".to_string(),
        &logger,
        Caller::new("src/net/peer.rs", 120, "app::net::peer::read"),
    );

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
        let encoder = LineEncoder::new(format);
        group.bench_function(format!("{:?}", format).to_lowercase(), |b| {
            b.iter(|| black_box(encoder.encode(black_box(&entry))));
        });
    }

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for thread_count in [2, 4, 8] {
        group.throughput(Throughput::Elements(thread_count as u64 * 100));
        group.bench_function(format!("threads_{}", thread_count), |b| {
            let registry = sink_registry(LogLevel::Info);
            b.iter(|| {
                let handles: Vec<_> = (0..thread_count)
                    .map(|i| {
                        let logger = registry.named(&format!("worker/{}", i));
                        std::thread::spawn(move || {
                            for j in 0..100 {
                                logger.infof(format_args!("message {}", j));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_handle_creation,
    bench_level_filtering,
    bench_emission,
    bench_encoding,
    bench_concurrent_logging,
);
criterion_main!(benches);
