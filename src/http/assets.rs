//! Static web client hosting.

use std::io;

use axum::extract::State;
use axum::response::Html;
use tower_http::services::ServeDir;

use crate::config::AssetsConfig;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// `GET /` — the index document as HTML.
pub async fn index(State(state): State<AppState>) -> Result<Html<Vec<u8>>, ApiError> {
    match tokio::fs::read(state.assets.index_path()).await {
        Ok(bytes) => Ok(Html(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ApiError::NotFound(format!(
            "{} not found",
            state.assets.index_file
        ))),
        Err(e) => Err(ApiError::Internal(format!(
            "failed to read {}: {}",
            state.assets.index_file, e
        ))),
    }
}

/// Files under the assets directory; MIME type from the extension.
/// Paths escaping the directory are refused by `ServeDir`.
pub fn asset_service(config: &AssetsConfig) -> ServeDir {
    ServeDir::new(&config.directory)
}
