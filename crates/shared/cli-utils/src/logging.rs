//! Logging configuration.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Full format with all metadata (timestamp, level, target, spans).
    ///
    /// Example: `2024-01-15T10:30:00.123456Z  INFO protokit::deploy: deployed contract`
    #[default]
    Full,

    /// Compact format with minimal metadata.
    Compact,

    /// JSON format for structured logging and log aggregation systems.
    Json,

    /// logfmt key/value pairs.
    ///
    /// Example: `time="..." level=INFO target=protokit::deploy msg="deployed contract"`
    Logfmt,
}

/// Console log sink settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleLogConfig {
    /// Output format.
    pub format: LogFormat,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level applied when `RUST_LOG` does not say otherwise.
    pub global_level: LevelFilter,
    /// Console sink, `None` when quiet.
    pub console_logs: Option<ConsoleLogConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global_level: LevelFilter::INFO,
            console_logs: Some(ConsoleLogConfig { format: LogFormat::Full }),
        }
    }
}

/// Maps a `-v` count to a level: 0=OFF, 1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5+=TRACE.
pub const fn verbosity_to_level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
