//! Logging macros for ergonomic log message formatting.
//!
//! These macros work like `println!`, check the level before formatting
//! anything, and record the enclosing function as well as the file and line.
//!
//! # Examples
//!
//! ```
//! use rust_named_logger::prelude::*;
//! use rust_named_logger::info;
//!
//! let registry = Registry::builder().level(LogLevel::Info).build();
//! let logger = registry.named("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Qualified name of the enclosing function, e.g. `my_crate::net::connect`.
///
/// Closure segments are removed, so a call inside a closure reports the
/// function that contains the closure.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        name.strip_suffix("::__here")
            .unwrap_or(name)
            .trim_end_matches("::{{closure}}")
    }};
}

/// [`Caller`](crate::Caller) for the location of the macro invocation.
#[macro_export]
macro_rules! caller {
    () => {
        $crate::Caller::new(file!(), line!(), $crate::function_name!())
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_named_logger::prelude::*;
/// # let logger = Registry::new().named("app");
/// use rust_named_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log_at($crate::caller!(), level, format_args!($($arg)+));
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_named_logger::prelude::*;
/// # let logger = Registry::new().named("app").with_level(LogLevel::Debug);
/// use rust_named_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_named_logger::prelude::*;
/// # let logger = Registry::new().named("app");
/// use rust_named_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal Server Error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Logger in the global registry named after the current module path, so
/// `my_crate::net::peer` logs as `my_crate/net/peer`.
#[macro_export]
macro_rules! module_logger {
    () => {
        $crate::named(module_path!())
    };
}
