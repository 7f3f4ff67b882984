//! Tracing subscriber initialization for CLI applications.

use std::{fmt, io, sync::Once};

use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, FormattedFields,
        format::{FormatEvent, FormatFields, Writer},
        time::{FormatTime, SystemTime},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::{ConsoleLogConfig, LogConfig, LogFormat};

/// Custom logfmt formatter for tracing events.
///
/// Outputs logs in logfmt format: `time="..." level=INFO target=myapp msg="hello world"`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtFormatter;

impl<S, N> FormatEvent<S, N> for LogfmtFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        write!(writer, "time=\"")?;
        SystemTime.format_time(&mut writer)?;
        write!(writer, "\" level={} target={} msg=\"", meta.level(), meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        write!(writer, "\"")?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, " {}={{", span.name())?;
                if let Some(fields) = span.extensions().get::<FormattedFields<N>>() {
                    write!(writer, "{fields}")?;
                }
                write!(writer, "}}")?;
            }
        }

        writeln!(writer)
    }
}

impl LogConfig {
    /// Initialize the tracing subscriber with the configured options.
    ///
    /// This sets the global default subscriber. Should only be called once.
    pub fn init_tracing_subscriber(&self) -> eyre::Result<()> {
        let filter =
            EnvFilter::builder().with_default_directive(self.global_level.into()).from_env_lossy();

        let console_layer = self.console_logs.as_ref().map(build_console_layer);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {}", e))
    }
}

/// Logs go to stderr so stdout stays free for command output.
fn build_console_layer<S>(config: &ConsoleLogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_timer(SystemTime);

    match config.format {
        LogFormat::Full => Box::new(base),
        LogFormat::Compact => Box::new(base.compact()),
        LogFormat::Json => Box::new(base.json()),
        LogFormat::Logfmt => Box::new(base.event_format(LogfmtFormatter)),
    }
}

/// Initialize tracing for tests with sensible defaults.
///
/// Uses `tracing_subscriber::fmt().with_test_writer()` for test output capture.
/// Only initializes once (safe to call from multiple tests).
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_tracing_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
