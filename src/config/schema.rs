//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Root configuration for the demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote FHIR server settings.
    pub upstream: UpstreamConfig,

    /// Questionnaire store settings.
    pub forms: FormsConfig,

    /// Static web client settings.
    pub assets: AssetsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// Resolve relative form and asset directories against `root`.
    pub fn rebase_paths(&mut self, root: &Path) {
        for dir in [&mut self.forms.directory, &mut self.assets.directory] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8888").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8888".to_string(),
        }
    }
}

/// Upstream FHIR server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every `/api/fhir/...` request is forwarded under.
    pub base_url: String,

    /// Pre-built `Authorization` header value. Takes precedence over
    /// `username`/`password`.
    pub auth_header: Option<String>,

    /// Basic auth user name.
    pub username: Option<String>,

    /// Basic auth password.
    pub password: Option<String>,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for upstream calls.
    pub use_system_proxy: bool,

    /// Largest request body accepted for forwarding.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/csp/healthshare/demo/fhir/r4".to_string(),
            auth_header: None,
            username: None,
            password: None,
            use_system_proxy: false,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UpstreamConfig {
    /// The `Authorization` value attached to upstream calls, if any.
    ///
    /// A non-empty `auth_header` is used verbatim. Otherwise a Basic header is
    /// derived when both `username` and `password` are present.
    pub fn authorization(&self) -> Option<String> {
        if let Some(header) = self.auth_header.as_deref().filter(|h| !h.is_empty()) {
            return Some(header.to_string());
        }

        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() => {
                let token = STANDARD.encode(format!("{}:{}", user, pass));
                Some(format!("Basic {}", token))
            }
            _ => None,
        }
    }
}

/// Questionnaire store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Directory holding the questionnaire JSON files.
    pub directory: PathBuf,

    /// File served by `/api/form` when no `name` is given.
    pub default_form: String,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("forms"),
            default_form: "History-of-Tobacco-use.R4.json".to_string(),
        }
    }
}

/// Static web client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory served under `mount_path`.
    pub directory: PathBuf,

    /// File (relative to `directory`) returned for `GET /`.
    pub index_file: String,

    /// URL prefix the directory is mounted at.
    pub mount_path: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("static"),
            index_file: "index.html".to_string(),
            mount_path: "/static".to_string(),
        }
    }
}

impl AssetsConfig {
    /// Full path of the page served for `GET /`.
    pub fn index_path(&self) -> PathBuf {
        self.directory.join(&self.index_file)
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Upstream call timeout (connect, send, and read the body) in seconds.
    pub upstream_secs: u64,

    /// Whole inbound request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
