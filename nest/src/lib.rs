//! # Nest - group flat records into nested dictionaries
//!
//! Nest turns a JSON array of flat records into a tree grouped by an ordered
//! list of field names. The grouping fields are removed from the records that
//! end up in the leaves.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ JSON array  │────▶│   Parser    │────▶│  Transform  │────▶│ Nested JSON │
//! │ (stdin/PUT) │     │ (FlatRecord)│     │ (iter/rec)  │     │ (by levels) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use nest::{parse_flat_records, transform, Strategy};
//!
//! let records = parse_flat_records(r#"[{"currency": "EUR", "country": "FR", "amount": 20}]"#).unwrap();
//! let nested = transform(
//!     Strategy::Iterative,
//!     vec!["currency".into(), "country".into()],
//!     records,
//! )
//! .unwrap();
//! assert_eq!(
//!     serde_json::to_string(&nested).unwrap(),
//!     r#"{"EUR":{"FR":[{"amount":20}]}}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Records, nesting levels, group keys, the nested tree
//! - [`transform`] - Iterative and recursive grouping strategies
//! - [`parser`] - Reading and decoding input
//! - [`config`] - Server configuration and credentials
//! - [`logs`] - Tracing subscriber setup
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Grouping
pub mod transform;

// Input
pub mod parser;

// Plumbing
pub mod config;
pub mod logs;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CliError, ConfigError, DecodeError, NestError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Branch, FlatRecord, GroupKey, Nested, NestingLevels, Sorted, MAX_SERIALIZE_DEPTH};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::recursive::DEFAULT_RECURSION_LIMIT;
pub use transform::{transform, Strategy};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{parse_flat_records, read_flat_records, read_input};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{Credentials, ServerConfig};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
