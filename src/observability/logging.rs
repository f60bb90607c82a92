//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Resolve the log filter from the environment or configuration
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level so operators can override it
//!   without touching the config file
//! - Initialization is idempotent; a second call is a no-op

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the filter: `RUST_LOG` if set and valid, else the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let result = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
