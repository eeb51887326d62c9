//! SDC demo server library.
//!
//! Serves a static single-page client, hands out stored FHIR Questionnaire
//! documents, and forwards `/api/fhir/*` to a remote FHIR server.

pub mod config;
pub mod forms;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
