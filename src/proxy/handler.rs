//! Handlers for `/api/fhir/*`.

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Mount point of the forwarding routes.
pub const FHIR_PREFIX: &str = "/api/fhir/";

/// Remaining path after the mount point, still percent-encoded.
fn forwarded_path(uri: &Uri) -> &str {
    uri.path().strip_prefix(FHIR_PREFIX).unwrap_or_default()
}

/// Forward a GET. Upstream errors are relayed like any other response.
pub async fn fhir_get(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let response = state
        .upstream
        .forward(Method::GET, forwarded_path(&uri), uri.query(), None, None)
        .await?;

    Ok(response.into_response())
}

/// Forward a POST. Upstream statuses >= 400 become an error carrying the
/// upstream body as its detail.
pub async fn fhir_post(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let response = state
        .upstream
        .forward(
            Method::POST,
            forwarded_path(&uri),
            uri.query(),
            headers.get(CONTENT_TYPE),
            Some(body),
        )
        .await?;

    if response.is_error() {
        return Err(ApiError::Upstream {
            status: response.status,
            body: response.body_text(),
        });
    }

    Ok(response.into_response())
}
