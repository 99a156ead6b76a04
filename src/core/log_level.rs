//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verbosity of a message or threshold of a logger.
///
/// Numerically lower is more severe: a message at level `L` passes a
/// threshold `T` iff `L <= T`. `Default` is not a real verbosity but the
/// "inherit" sentinel: a handle or file entry holding it defers to the next
/// layer up, and a message logged at `Default` is never emitted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Info = 1,
    Debug = 2,
    #[default]
    Default = 3,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Default => "DEFAULT",
        }
    }

    /// All levels that can gate a message, most severe first.
    pub const fn all() -> [LogLevel; 3] {
        [LogLevel::Error, LogLevel::Info, LogLevel::Debug]
    }

    /// `true` for the inherit sentinel.
    #[inline]
    pub fn is_default(&self) -> bool {
        *self == LogLevel::Default
    }

    /// Whether a message at `self` passes the given threshold.
    #[inline]
    pub fn passes(&self, threshold: LogLevel) -> bool {
        !self.is_default() && *self <= threshold
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Error => Red,
            LogLevel::Info => Green,
            LogLevel::Debug => Blue,
            LogLevel::Default => BrightBlack,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() keeps width/precision working for the text layout
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            "INFO" | "INF" => Ok(LogLevel::Info),
            "DEBUG" | "DBG" => Ok(LogLevel::Debug),
            "DEFAULT" | "INHERIT" => Ok(LogLevel::Default),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
