//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the upstream client produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every request and response
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
