//! Logging to a file through a background worker
//!
//! Run with: cargo run --example background_file

use rust_named_logger::prelude::*;
use rust_named_logger::LineEncoder;
use std::sync::Arc;

fn main() -> Result<()> {
    let path = std::env::temp_dir().join("rust_named_logger_demo.log");

    let file = FileAppender::new(&path)?.with_encoder(LineEncoder::new(OutputFormat::Logfmt));
    let background = Arc::new(BackgroundAppender::with_config(
        Arc::new(file),
        1024,
        OverflowPolicy::Block,
    ));

    let registry = Registry::builder()
        .level(LogLevel::Info)
        .shared_appender(background.clone())
        .build();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let log = registry.named("jobs").with("worker", worker);
            std::thread::spawn(move || {
                for job in 0..25 {
                    log.infof(format_args!("job {} done", job));
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    background.flush()?;
    let snapshot = background.metrics().snapshot();
    println!(
        "wrote {} records to {} ({} dropped)",
        snapshot.total_logged,
        path.display(),
        snapshot.dropped_count
    );
    Ok(())
}
