//! FHIR forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! GET|POST /api/fhir/<path>?<query>
//!     → handler.rs (strip prefix, pick GET/POST semantics)
//!     → headers.rs (allow-listed outbound headers + auth)
//!     → client.rs (one upstream call, bounded by timeout)
//!     → UpstreamResponse relayed to the caller
//! ```
//!
//! # Design Decisions
//! - Inbound headers are never passed through; the outbound set is built
//! - POST surfaces upstream errors (>= 400) as the error detail
//! - GET relays whatever the upstream answered, errors included
//! - No retries and no response caching

pub mod client;
pub mod handler;
pub mod headers;

pub use client::{FhirUpstream, UpstreamResponse, UpstreamSetupError};
pub use headers::{upstream_headers, upstream_url, FHIR_JSON};
