//! # Logging & Tracing Infrastructure
//!
//! Configures the `tracing-subscriber` stack for the workspace, supporting:
//! - Pretty, compact and JSON output formats
//! - Module-level filtering via `EnvFilter`
//! - Path stripping so file operations never log full paths
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Compact)
//!     .with_level(tracing::Level::DEBUG);
//!
//! init_logging(config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

use crate::error::{Error, Result};
use std::io;
use tracing::Level;
use tracing_subscriber::{
    filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level
    pub level: Level,
    /// Custom filter string (e.g., "core_player=debug")
    pub filter: Option<String>,
    /// Display target module in logs
    pub display_target: bool,
    /// Display thread info
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: Level::INFO,
            filter: None,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Enable or disable target display
    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    /// Enable or disable thread info
    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the logging system
///
/// This should be called once during application startup. Subsequent calls
/// will return an error.
///
/// # Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - The filter string is invalid
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_writer(io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_writer(io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
        }
        LogFormat::Compact => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_writer(io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
        }
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let base_level = config.level.to_string().to_lowercase();

    let filter_string = if let Some(custom_filter) = &config.filter {
        custom_filter.clone()
    } else {
        // Our crates at the configured level, dependencies at warn
        format!(
            "warn,core_runtime={},core_player={}",
            base_level, base_level
        )
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

/// Strip full file paths to basename only for privacy
///
/// Useful when logging file operations:
///
/// ```
/// use core_runtime::logging::strip_path;
///
/// assert_eq!(strip_path("/home/user/music/song.mp3"), "song.mp3");
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit('/')
        .next()
        .unwrap_or(path)
        .rsplit('\\')
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(Level::DEBUG)
            .with_filter("core_player=trace")
            .with_target(true)
            .with_thread_info(true);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.filter, Some("core_player=trace".to_string()));
        assert!(config.display_target);
        assert!(config.display_thread_info);
    }

    #[test]
    fn test_default_format() {
        #[cfg(debug_assertions)]
        assert_eq!(LogFormat::default(), LogFormat::Pretty);

        #[cfg(not(debug_assertions))]
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }

    #[test]
    fn test_build_filter() {
        let config = LoggingConfig::default().with_level(Level::DEBUG);
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_build_custom_filter() {
        let config = LoggingConfig::default().with_filter("core_player=trace");
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("core_player=trace"));
    }

    #[test]
    fn test_strip_path() {
        assert_eq!(strip_path("/home/user/music/song.mp3"), "song.mp3");
        assert_eq!(strip_path("C:\\Users\\John\\Music\\song.mp3"), "song.mp3");
        assert_eq!(strip_path("song.mp3"), "song.mp3");
        assert_eq!(strip_path("/var/log/"), "");
    }
}
