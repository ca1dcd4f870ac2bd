//! Subscriber setup for binaries and tests that want the library's spans as JSON.
use thiserror::Error;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to redirect log records to tracing")]
    Logger,

    #[error("a global subscriber is already installed")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Builds a bunyan-formatted subscriber writing to `sink`.
///
/// `RUST_LOG` takes precedence over `env_filter` when set.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs `subscriber` as the global default. Can only succeed once per process.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync + 'static,
) -> Result<(), TelemetryError> {
    LogTracer::init().map_err(|_| TelemetryError::Logger)?;
    set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let first = init_subscriber(get_subscriber(
            "extractable_schnorr".into(),
            "debug".into(),
            std::io::sink,
        ));
        assert!(first.is_ok());

        let second = init_subscriber(get_subscriber(
            "extractable_schnorr".into(),
            "debug".into(),
            std::io::sink,
        ));
        assert!(second.is_err());
    }
}
