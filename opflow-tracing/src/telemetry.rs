use crate::TracingError;
use opflow_types::constants::DEFAULT_LOG_LEVEL;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// `RUST_LOG` if set, otherwise the configured level, otherwise `info`.
pub fn log_filter(level: Option<&str>) -> Result<EnvFilter, TracingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    EnvFilter::try_new(level).map_err(|e| TracingError::InvalidFilter(level.to_string(), e))
}

// Init logging by setting a global handler
pub fn init_logging(level: Option<&str>) -> Result<(), TracingError> {
    let fmt_layer = fmt::layer().with_target(false);
    let fmt_filter = log_filter(level)?;

    // keeps an already installed subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt_layer.with_filter(fmt_filter))
        .try_init();
    Ok(())
}

// Init logging for the duration of a closure without setting a global subscriber
pub fn init_logging_closure<T>(
    level: Option<&str>,
    closure: impl FnOnce() -> T,
) -> Result<T, TracingError> {
    let fmt_layer = fmt::layer().with_target(false).with_test_writer();
    let fmt_filter = log_filter(level)?;

    let subscriber = tracing_subscriber::registry().with(fmt_layer.with_filter(fmt_filter));

    Ok(opflow_types::tracing::subscriber::with_default(
        subscriber, closure,
    ))
}
