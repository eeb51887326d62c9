//! Configuration loading from disk and the process environment.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate the result.
///
/// Relative directories in (or defaulted by) a config file resolve against
/// the file's own directory; without a file they are relative to the working
/// directory. Variables from a `.env` file (searched from the working
/// directory upwards) fill in anything the real environment leaves unset.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let mut config: ServerConfig = toml::from_str(&content)?;
            if let Some(root) = path.parent() {
                config.rebase_paths(root);
            }
            config
        }
        None => ServerConfig::default(),
    };

    let dotenv = read_dotenv()?;
    apply_env_overrides(
        &mut config,
        layered_lookup(&dotenv, |key| std::env::var(key).ok()),
    );

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Variables from the nearest `.env` file; empty when there is none.
fn read_dotenv() -> Result<HashMap<String, String>, ConfigError> {
    match dotenvy::dotenv_iter() {
        Ok(iter) => Ok(iter.collect::<Result<_, _>>()?),
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Variables from the `.env` file at `path`.
pub fn read_dotenv_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    Ok(dotenvy::from_path_iter(path)?.collect::<Result<_, _>>()?)
}

/// Lookup where `process` wins and `dotenv` fills the gaps.
pub fn layered_lookup<'a, P>(
    dotenv: &'a HashMap<String, String>,
    process: P,
) -> impl Fn(&str) -> Option<String> + 'a
where
    P: Fn(&str) -> Option<String> + 'a,
{
    move |key| process(key).or_else(|| dotenv.get(key).cloned())
}

/// Overlay environment-provided values onto `config`.
///
/// `lookup` resolves a variable name to its value. Unset and empty values
/// leave the existing setting untouched.
pub fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("FHIR_BASE") {
        config.upstream.base_url = v;
    }
    if let Some(v) = get("FHIR_AUTH_HEADER") {
        config.upstream.auth_header = Some(v);
    }
    if let Some(v) = get("FHIR_USERNAME") {
        config.upstream.username = Some(v);
    }
    if let Some(v) = get("FHIR_PASSWORD") {
        config.upstream.password = Some(v);
    }
    if let Some(v) = get("FORM_FILE") {
        config.forms.default_form = v;
    }
    if let Some(v) = get("SDC_BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = get("SDC_STATIC_DIR") {
        config.assets.directory = PathBuf::from(v);
    }
    if let Some(v) = get("SDC_FORMS_DIR") {
        config.forms.directory = PathBuf::from(v);
    }
}
