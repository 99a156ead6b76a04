//! Basic logger usage example
//!
//! Demonstrates named loggers, levels, per-handle overrides and fields.
//!
//! Run with: cargo run --example basic_usage

use rust_named_logger::prelude::*;
use rust_named_logger::{debug, info};

fn main() -> Result<()> {
    println!("=== Rust Named Logger - Basic Usage Example ===\n");

    // One registry for the whole application; records go to stderr
    let registry = Registry::new();
    let app = registry.named("app");

    println!("1. Every logger starts at ERROR:");
    app.info("Info message (hidden)");
    app.error("Error message (visible)");

    println!("\n2. Raising the level of the application subtree:");
    registry.named("app").set_level(LogLevel::Debug);
    let db = app.derive("db");
    debug!(db, "connecting to {}", "postgres://localhost");
    info!(db, "pool ready with {} connections", 8);

    println!("\n3. Handles with their own level and fields:");
    let request = app.with("request_id", 4711).with("user", "alice");
    request.info("handling request");

    let quiet = request.with_level(LogLevel::Error);
    quiet.info("Info message through a quiet handle (hidden)");
    quiet.error("Error message through a quiet handle (visible)");

    println!("\n4. Registry tree:");
    print!("{}", registry.tree());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
