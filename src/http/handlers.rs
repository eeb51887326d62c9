//! JSON API handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::forms::QuestionnaireDocument;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub name: Option<String>,
}

/// `GET /api/form?name=` — a questionnaire from the forms directory.
pub async fn get_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<QuestionnaireDocument, ApiError> {
    Ok(state.forms.load(query.name.as_deref()).await?)
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness check; never touches the upstream.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
