//! Logging configuration

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSettings};

impl LoggingSettings {
    /// Filter for these settings; `RUST_LOG` wins when set
    pub fn filter(&self) -> anyhow::Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| anyhow::anyhow!("bad log level {:?}: {}", self.level, e)),
        }
    }
}

/// Install the global subscriber described by the `[logging]` section
pub fn init(settings: &LoggingSettings) -> anyhow::Result<()> {
    let (json, text) = match settings.format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Text => (None, Some(fmt::layer().with_target(true))),
    };

    tracing_subscriber::registry()
        .with(settings.filter()?)
        .with(json)
        .with(text)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialised: {}", e))
}
