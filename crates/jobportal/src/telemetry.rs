//! Process-wide logging setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::PortalError;

/// Builds the filter: `RUST_LOG` wins over the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs the global subscriber and routes `log` records into it.
///
/// Call once, early in `main`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), PortalError> {
    let (json, pretty) = match config.format {
        LogFormat::Json => (Some(fmt::layer().json().with_current_span(true)), None),
        LogFormat::Pretty => (None, Some(fmt::layer().with_target(true))),
    };

    let subscriber = Registry::default()
        .with(env_filter(config))
        .with(json)
        .with(pretty);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PortalError::Logging(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| PortalError::Logging(e.to_string()))?;

    Ok(())
}
