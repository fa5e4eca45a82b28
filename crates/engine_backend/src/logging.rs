use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::settings::LoggingSettings;

/// Build the filter, preferring RUST_LOG over the configured level
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Initialize logging and tracing subsystem
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let registry = Registry::default().with(env_filter(settings));

    if settings.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_thread_names(true)
                    .with_target(true),
            )
            .try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %settings.level,
        "Manipulation logging initialized"
    );

    Ok(())
}
