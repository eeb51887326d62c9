//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: FHIR_BASE, FORM_FILE, ...)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated afterwards
//! - All fields have defaults so the server runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    AssetsConfig, FormsConfig, ListenerConfig, ObservabilityConfig, ServerConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
