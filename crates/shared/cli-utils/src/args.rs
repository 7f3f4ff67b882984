//! Log-related CLI arguments.

use clap::{ArgAction, Parser};

use crate::{ConsoleLogConfig, LogConfig, LogFormat, verbosity_to_level_filter};

/// Log-related CLI arguments.
///
/// Verbosity levels: 1=ERROR, 2=WARN, 3=INFO (default), 4=DEBUG, 5=TRACE.
/// Use `-q` to suppress console logging entirely.
#[derive(Debug, Clone, Parser)]
pub struct LogArgs {
    /// Increase logging verbosity (1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5=TRACE).
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        default_value = "3",
        env = "PROTOKIT_LOG_LEVEL",
        global = true
    )]
    pub level: u8,

    /// Suppress console logging.
    #[arg(long = "quiet", short = 'q', global = true)]
    pub quiet: bool,

    /// Console log format.
    #[arg(long = "log-format", default_value = "full", env = "PROTOKIT_LOG_FORMAT", global = true)]
    pub format: LogFormat,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self { level: 3, quiet: false, format: LogFormat::Full }
    }
}

impl From<LogArgs> for LogConfig {
    fn from(args: LogArgs) -> Self {
        let console_logs = (!args.quiet).then_some(ConsoleLogConfig { format: args.format });
        Self { global_level: verbosity_to_level_filter(args.level), console_logs }
    }
}
