//! Logging setup shared by the Readiego binaries
//!
//! The CLI logs to stderr and stays quiet unless asked. The terminal UI owns
//! the screen, so it can only log into a file.
//!
//! ```no_run
//! use libreadiego::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "debug".to_string(), false).init();
//! ```
//!
//! Or from `READIEGO_LOG_FORMAT` / `READIEGO_LOG_LEVEL`:
//!
//! ```no_run
//! libreadiego::logging::config_from_env(false, "error").init();
//! ```

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One plain line per event
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line, with source locations
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "Invalid log format: '{other}'. Valid options: text, json, pretty"
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        })
    }
}

pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Forces `debug` when `RUST_LOG` is unset
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// The directive that applies when `RUST_LOG` is unset
    pub fn directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }

    /// Install the global subscriber, writing to stderr
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already installed.
    pub fn init(&self) {
        self.install(std::io::stderr, true);
    }

    /// Install the global subscriber, appending to `path` without colors
    pub fn init_with_file(&self, path: &Path) -> std::io::Result<()> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        self.install(Mutex::new(file), false);
        Ok(())
    }

    fn install<W>(&self, writer: W, ansi: bool)
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(writer)
            .with_ansi(ansi);

        match self.format {
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .init(),
            LogFormat::Pretty => builder
                .pretty()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .init(),
            LogFormat::Text => builder.with_target(false).init(),
        }
    }
}

/// Build a config from `READIEGO_LOG_FORMAT` and `READIEGO_LOG_LEVEL`
///
/// Format falls back to text, level to `default_level`.
pub fn config_from_env(verbose: bool, default_level: &str) -> LoggingConfig {
    let format = std::env::var("READIEGO_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level = std::env::var("READIEGO_LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());

    LoggingConfig::new(format, level, verbose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_parsing_ignores_case() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("Json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_rejects_unknown() {
        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_log_format_display_round_trips() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_verbose_overrides_level() {
        let config = LoggingConfig::new(LogFormat::Text, "error".to_string(), true);
        assert_eq!(config.directive(), "debug");

        let config = LoggingConfig::new(LogFormat::Text, "warn".to_string(), false);
        assert_eq!(config.directive(), "warn");
    }

    #[test]
    #[serial]
    fn test_config_from_env_level() {
        std::env::remove_var("READIEGO_LOG_LEVEL");
        std::env::remove_var("READIEGO_LOG_FORMAT");
        let config = config_from_env(false, "error");
        assert_eq!(config.level, "error");
        assert_eq!(config.format, LogFormat::Text);

        std::env::set_var("READIEGO_LOG_LEVEL", "trace");
        std::env::set_var("READIEGO_LOG_FORMAT", "json");
        let config = config_from_env(false, "error");
        std::env::remove_var("READIEGO_LOG_LEVEL");
        std::env::remove_var("READIEGO_LOG_FORMAT");
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Json);
    }
}
