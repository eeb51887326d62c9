//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout)
//!     → route by method + path:
//!         GET  /               → assets.rs (index document)
//!         GET  /static/*       → assets.rs (ServeDir)
//!         GET  /api/form       → handlers.rs → forms::FormStore
//!         GET|POST /api/fhir/* → proxy::handler
//!         GET  /healthz        → handlers.rs
//!     → error.rs (failures → status + {"detail"})
//!     → Send to client
//! ```

pub mod assets;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer, ServerError};
