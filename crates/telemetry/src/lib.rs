//! Telemetry facade: installs the global tracing subscriber.

use anyhow::Context;
use stacks_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing/logging pipeline.
///
/// The filter comes from `RUST_LOG` when set, otherwise defaults to `info`.
/// Installs a global subscriber, so this must be called at most once per
/// process.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
    }
    .map_err(|error| anyhow::anyhow!("{error}"))
    .context("failed to install tracing subscriber")?;

    tracing::debug!(
        target: "stacks-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}
