//! Structured logging.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! this crate and to `tower_http`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!(
        "sdc_demo_server={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(config))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
