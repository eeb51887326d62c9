//! Upstream FHIR client with timeout and error handling.
//!
//! # Responsibilities
//! - Issue exactly one upstream call per inbound request
//! - Bound every call by the configured timeout
//! - Map timeouts to 504 and connection failures to 502
//!
//! # Design Decisions
//! - Idle pooling is disabled: each call's connection is dropped as soon as
//!   the response body has been read or the call has failed
//! - The whole upstream body is buffered before it is relayed

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::http::error::ApiError;
use crate::observability::metrics;
use crate::proxy::headers::{upstream_headers, upstream_url, FHIR_JSON};

/// Error building the upstream client at startup.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamSetupError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("upstream authorization is not a valid header value")]
    InvalidAuthorization,
}

/// Buffered upstream answer, relayed to the caller unchanged.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// True for 4xx and 5xx upstream answers.
    pub fn is_error(&self) -> bool {
        self.status.as_u16() >= 400
    }

    /// Body as text, for surfacing as an error detail.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Client for the configured FHIR server.
#[derive(Debug, Clone)]
pub struct FhirUpstream {
    client: reqwest::Client,
    base_url: String,
    authorization: Option<HeaderValue>,
}

impl FhirUpstream {
    /// Build the client with the configured timeouts and credentials.
    pub fn new(config: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, UpstreamSetupError> {
        let authorization = config
            .authorization()
            .map(|value| HeaderValue::from_str(&value))
            .transpose()
            .map_err(|_| UpstreamSetupError::InvalidAuthorization)?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .pool_max_idle_per_host(0);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            authorization,
        })
    }

    /// Base URL requests are forwarded under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether upstream calls carry an `Authorization` header.
    pub fn has_authorization(&self) -> bool {
        self.authorization.is_some()
    }

    /// Forward one request to `<base>/<path>?<query>`.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        content_type: Option<&HeaderValue>,
        body: Option<Bytes>,
    ) -> Result<UpstreamResponse, ApiError> {
        let url = upstream_url(&self.base_url, path, query);
        let headers = upstream_headers(&method, content_type, self.authorization.as_ref());
        let start = Instant::now();

        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static(FHIR_JSON));
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse {
                status,
                content_type,
                body,
            })
        }
        .await;

        match result {
            Ok(response) => {
                metrics::record_upstream(method.as_str(), response.status.as_u16(), start);
                tracing::debug!(
                    method = %method,
                    url = %url,
                    status = %response.status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                Ok(response)
            }
            Err(e) => {
                let err = ApiError::from(e);
                metrics::record_upstream(method.as_str(), err.status().as_u16(), start);
                tracing::error!(method = %method, url = %url, error = %err, "Upstream error");
                Err(err)
            }
        }
    }
}
