//! Questionnaire store subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/form?name=...
//!     → store.rs (resolve name inside the forms directory)
//!     → store.rs (read, parse, check resourceType)
//!     → QuestionnaireDocument (original bytes, served as JSON)
//! ```
//!
//! # Design Decisions
//! - Names are resolved to canonical paths before the containment check,
//!   never matched as raw strings
//! - Each request re-reads the file; nothing is cached
//! - The file bytes are returned untouched once validated

pub mod store;

pub use store::{FormError, FormStore, QuestionnaireDocument};
