//! Libraries and applications sharing one hierarchy
//!
//! A library names its logger after itself and never configures it. The
//! application decides which parts of which libraries it wants to hear from.
//!
//! Run with: cargo run --example library_levels

use rust_named_logger::prelude::*;

mod fakelib {
    use rust_named_logger::{Logger, Registry};

    pub struct Client {
        log: Logger,
    }

    impl Client {
        pub fn new(registry: &Registry) -> Self {
            Self {
                log: registry.named("fakelib/client"),
            }
        }

        pub fn fetch(&self, url: &str) {
            let log = self.log.with("url", url);
            log.debug("resolving host");
            log.info("request sent");
            if url.ends_with("/missing") {
                log.error("404 not found");
            }
        }
    }
}

fn main() -> Result<()> {
    let registry = Registry::new();
    let client = fakelib::Client::new(&registry);

    println!("--- library at its default level (errors only)");
    client.fetch("https://example.com/");
    client.fetch("https://example.com/missing");

    println!("--- application enables INFO for fakelib");
    let config = LoggingConfig::from_directives("error,fakelib=info")?;
    registry.apply_config(&config)?;
    client.fetch("https://example.com/");

    println!("--- and DEBUG for fakelib/client only");
    registry.named("fakelib/client").set_level(LogLevel::Debug);
    client.fetch("https://example.com/");

    Ok(())
}
