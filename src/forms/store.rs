//! Reads questionnaire documents from the forms directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::http::error::ApiError;

/// Discriminator value every served document must carry.
const QUESTIONNAIRE: &str = "Questionnaire";

/// Errors raised while loading a form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Invalid file name")]
    InvalidName,

    #[error("Form not found: {0}")]
    NotFound(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("File is not a FHIR Questionnaire")]
    NotQuestionnaire,

    #[error("Failed to read form: {0}")]
    Io(#[from] io::Error),
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::NotFound(_) => ApiError::NotFound(err.to_string()),
            FormError::Io(_) => ApiError::Internal(err.to_string()),
            FormError::InvalidName | FormError::InvalidJson(_) | FormError::NotQuestionnaire => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

/// A validated questionnaire, kept as the exact bytes read from disk.
#[derive(Debug, Clone)]
pub struct QuestionnaireDocument {
    pub name: String,
    pub body: Bytes,
}

impl IntoResponse for QuestionnaireDocument {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

/// Read-only view over the forms directory.
#[derive(Debug, Clone)]
pub struct FormStore {
    root: PathBuf,
    default_form: String,
}

impl FormStore {
    /// Create a store rooted at `directory`.
    ///
    /// The directory is canonicalized once here. If it does not exist yet the
    /// absolute path is used, so every lookup simply reports "not found".
    pub fn new(directory: &Path, default_form: impl Into<String>) -> Self {
        let root = std::fs::canonicalize(directory)
            .or_else(|_| std::path::absolute(directory))
            .unwrap_or_else(|_| directory.to_path_buf());

        Self {
            root,
            default_form: default_form.into(),
        }
    }

    /// Canonical forms directory every lookup must stay inside.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a path strictly inside the forms directory.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, FormError> {
        if name.contains('\0') {
            return Err(FormError::InvalidName);
        }

        // An absolute `name` replaces the root entirely; the check below
        // rejects it unless it points back inside.
        let candidate = self.root.join(name);
        let resolved = resolve_non_strict(&candidate).await;

        if resolved != self.root && resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(FormError::InvalidName)
        }
    }

    /// Load and validate a questionnaire. `None` or an empty name selects the
    /// configured default form.
    pub async fn load(&self, name: Option<&str>) -> Result<QuestionnaireDocument, FormError> {
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_form.as_str());
        let path = self.resolve(name).await?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(FormError::NotFound(name.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FormError::NotFound(name.to_string()));
            }
            Err(e) => return Err(FormError::Io(e)),
        }

        let body = Bytes::from(tokio::fs::read(&path).await?);

        let value: Value =
            serde_json::from_slice(&body).map_err(|e| FormError::InvalidJson(e.to_string()))?;

        if value.get("resourceType").and_then(Value::as_str) != Some(QUESTIONNAIRE) {
            return Err(FormError::NotQuestionnaire);
        }

        tracing::debug!(form = %name, bytes = body.len(), "Questionnaire loaded");

        Ok(QuestionnaireDocument {
            name: name.to_string(),
            body,
        })
    }
}

/// Canonicalize the longest existing ancestor of `path` and append the
/// missing tail, so symlinks are followed as far as the path exists.
async fn resolve_non_strict(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        if let Ok(base) = tokio::fs::canonicalize(ancestor).await {
            let tail = path.strip_prefix(ancestor).unwrap_or(Path::new(""));
            return normalize_lexically(&base.join(tail));
        }
    }
    normalize_lexically(path)
}

/// Collapse `.` and `..` without touching the filesystem. Used for the part
/// of a path that does not exist, where canonicalization is impossible.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
