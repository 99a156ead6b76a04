//! Start-up configuration
//!
//! [`LoggingConfig`] is what an application reads from its own config file or
//! environment and hands to [`Registry::apply_config`] once. Logging calls
//! never read it.

use super::{
    appender::SharedAppender,
    error::{LoggerError, Result},
    log_level::LogLevel,
    output_format::{LineEncoder, OutputFormat},
    registry::{path_segments, Registry},
    timestamp::TimestampFormat,
};
use crate::appenders::{ConsoleAppender, FileAppender};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable read by [`LoggingConfig::from_default_env`].
pub const DEFAULT_ENV_VAR: &str = "NAMED_LOG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level of the root and, through propagation, of every logger
    pub level: LogLevel,
    /// Per-path levels, e.g. `"net/peer" = "debug"`
    pub levels: BTreeMap<String, LogLevel>,
    pub format: OutputFormat,
    pub timestamp: TimestampFormat,
    /// Append to this file instead of writing to stderr
    pub file: Option<PathBuf>,
    /// Colour the level column on stderr (text format only)
    pub colors: bool,
}

impl LoggingConfig {
    /// Parse a JSON document such as
    /// `{"level": "info", "levels": {"net/peer": "debug"}, "format": "json"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse comma-separated directives: a bare level sets the global level,
    /// `path=level` sets one path.
    ///
    /// ```
    /// use rust_named_logger::{LoggingConfig, LogLevel};
    ///
    /// let config = LoggingConfig::from_directives("info, net/peer=debug").unwrap();
    /// assert_eq!(config.level, LogLevel::Info);
    /// assert_eq!(config.levels["net/peer"], LogLevel::Debug);
    /// ```
    pub fn from_directives(directives: &str) -> Result<Self> {
        let mut config = Self::default();
        for directive in directives.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }
            match directive.split_once('=') {
                Some((path, level)) => {
                    let path = path.trim();
                    if path_segments(path).next().is_none() {
                        return Err(LoggerError::config(
                            "LoggingConfig",
                            format!("directive '{}' has no logger path", directive),
                        ));
                    }
                    config.levels.insert(path.to_string(), parse_level(level)?);
                }
                None => config.level = parse_level(directive)?,
            }
        }
        Ok(config)
    }

    /// Directives from the environment variable `var`; an unset variable
    /// yields the default configuration.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(directives) => Self::from_directives(&directives),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(LoggerError::config(var, e.to_string())),
        }
    }

    pub fn from_default_env() -> Result<Self> {
        Self::from_env(DEFAULT_ENV_VAR)
    }

    /// Builder-style per-path level.
    #[must_use]
    pub fn with_path_level(mut self, path: impl Into<String>, level: LogLevel) -> Self {
        self.levels.insert(path.into(), level);
        self
    }

    fn build_appender(&self) -> Result<SharedAppender> {
        let appender: SharedAppender = match &self.file {
            Some(path) => {
                let encoder =
                    LineEncoder::new(self.format).with_timestamp_format(self.timestamp.clone());
                Arc::new(FileAppender::new(path)?.with_encoder(encoder))
            }
            None => Arc::new(
                ConsoleAppender::with_colors(self.colors)
                    .with_output_format(self.format)
                    .with_timestamp_format(self.timestamp.clone()),
            ),
        };
        Ok(appender)
    }
}

fn parse_level(value: &str) -> Result<LogLevel> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| LoggerError::invalid_level(value))
}

impl Registry {
    /// Install the configured appender on every node, then the global level,
    /// then the per-path levels from the shallowest path to the deepest so a
    /// parent's level never overwrites a more specific one.
    pub fn apply_config(&self, config: &LoggingConfig) -> Result<()> {
        let appender = config.build_appender()?;
        self.set_global_appender(appender);
        self.set_global_level(config.level);

        let mut levels: Vec<(&String, &LogLevel)> = config.levels.iter().collect();
        levels.sort_by_key(|(path, _)| path_segments(path).count());
        for (path, level) in levels {
            self.node(path).set_level(*level);
        }
        Ok(())
    }
}
