//! Appender implementations

pub mod background;
pub mod console;
pub mod file;
pub mod memory;
pub mod stream;

pub use background::{BackgroundAppender, OverflowPolicy};
pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use memory::MemoryAppender;
pub use stream::StreamAppender;

pub use crate::core::Appender;
