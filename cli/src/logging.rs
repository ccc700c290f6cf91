use crm::LogFormat;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for command output. Keep the guard alive until exit or buffered lines are
/// lost.
pub fn init_logging(format: LogFormat) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .log_internal_errors(true)
                    .with_target(false)
                    .flatten_event(true)
                    .with_span_list(false)
                    .with_writer(writer),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_target(false).with_writer(writer))
            .init(),
    }

    guard
}
