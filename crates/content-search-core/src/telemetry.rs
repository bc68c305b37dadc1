//! Tracing subscriber setup for applications embedding the crate.
//!
//! The library itself only emits `tracing` events; installing a subscriber is the
//! embedding application's choice.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Installs a global subscriber with an [`EnvFilter`] and a text or JSON formatter.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `false` when a global
/// subscriber is already installed, in which case nothing changes.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if installed.is_ok() {
        tracing::debug!(level = %config.level, format = %config.format, "Tracing initialized");
    }
    installed.is_ok()
}
