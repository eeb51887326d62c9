//! Startup orchestration.
//!
//! Order: logging → metrics → server state → listener → serve.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::server::{HttpServer, ServerError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_signal;
use crate::observability::{logging, metrics};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the server until SIGINT/SIGTERM.
pub async fn start(config: ServerConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        forms_dir = %config.forms.directory.display(),
        static_dir = %config.assets.directory.display(),
        default_form = %config.forms.default_form,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Already checked by validation.
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let server = HttpServer::new(config)?;

    let address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
