//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, body limit)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AssetsConfig, ServerConfig};
use crate::forms::FormStore;
use crate::http::{assets, handlers};
use crate::lifecycle::shutdown::wait as shutdown_requested;
use crate::observability::metrics;
use crate::proxy::handler::{fhir_get, fhir_post, FHIR_PREFIX};
use crate::proxy::{FhirUpstream, UpstreamSetupError};

/// Error building the server from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Upstream(#[from] UpstreamSetupError),
}

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<FormStore>,
    pub upstream: Arc<FhirUpstream>,
    pub assets: Arc<AssetsConfig>,
}

impl AppState {
    /// Build shared handler state from a validated configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        Ok(Self {
            forms: Arc::new(FormStore::new(
                &config.forms.directory,
                config.forms.default_form.clone(),
            )),
            upstream: Arc::new(FhirUpstream::new(&config.upstream, &config.timeouts)?),
            assets: Arc::new(config.assets.clone()),
        })
    }
}

/// HTTP server for the demo application.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;

        tracing::debug!(
            forms_root = %state.forms.root().display(),
            upstream_auth = state.upstream.has_authorization(),
            "Application state ready"
        );

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        // `{*path}` needs a non-empty tail, so the base itself is its own route.
        let fhir = Router::new()
            .route(FHIR_PREFIX, get(fhir_get).post(fhir_post))
            .route(&format!("{}{{*path}}", FHIR_PREFIX), get(fhir_get).post(fhir_post))
            .layer(DefaultBodyLimit::max(config.upstream.max_body_bytes));

        Router::new()
            .route("/", get(assets::index))
            .route("/api/form", get(handlers::get_form))
            .route("/healthz", get(handlers::health))
            .merge(fhir)
            .nest_service(&config.assets.mount_path, assets::asset_service(&config.assets))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_requested(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
