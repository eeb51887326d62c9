//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream URL and derived auth header are usable
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {field} address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid upstream base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("upstream authorization is not a valid header value")]
    InvalidAuthHeader,

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("request_secs ({request}) must exceed upstream_secs ({upstream})")]
    RequestTimeoutTooShort { request: u64, upstream: u64 },

    #[error("default form file name must not be empty")]
    EmptyDefaultForm,

    #[error("static mount path '{0}' must start with '/' and not be the root")]
    InvalidMountPath(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics",
            value: config.observability.metrics_address.clone(),
        });
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.upstream.base_url.clone())),
    }

    if let Some(auth) = config.upstream.authorization() {
        if HeaderValue::from_str(&auth).is_err() {
            errors.push(ValidationError::InvalidAuthHeader);
        }
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("upstream_secs", config.timeouts.upstream_secs),
        ("request_secs", config.timeouts.request_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    // Inbound deadline must outlast the upstream call so stalls surface as 504.
    if config.timeouts.request_secs <= config.timeouts.upstream_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.timeouts.request_secs,
            upstream: config.timeouts.upstream_secs,
        });
    }

    if config.forms.default_form.trim().is_empty() {
        errors.push(ValidationError::EmptyDefaultForm);
    }

    let mount = &config.assets.mount_path;
    if !mount.starts_with('/') || mount == "/" {
        errors.push(ValidationError::InvalidMountPath(mount.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.base_url = "ftp://files.example.org".into();
        config.timeouts.upstream_secs = 0;
        config.forms.default_form = "".into();
        config.assets.mount_path = "/".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroTimeout("upstream_secs")));
        assert!(errors.contains(&ValidationError::EmptyDefaultForm));
        assert!(errors.contains(&ValidationError::InvalidBaseUrl(
            "ftp://files.example.org".into()
        )));
    }

    #[test]
    fn test_request_timeout_must_exceed_upstream_timeout() {
        let mut config = ServerConfig::default();
        config.timeouts.upstream_secs = 3;
        config.timeouts.request_secs = 1;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::RequestTimeoutTooShort {
                request: 1,
                upstream: 3,
            }]
        );

        config.timeouts.request_secs = 3;
        assert!(validate_config(&config).is_err());

        config.timeouts.request_secs = 4;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_auth_header_with_newline() {
        let mut config = ServerConfig::default();
        config.upstream.auth_header = Some("Bearer abc\r\nX-Evil: 1".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidAuthHeader]);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
