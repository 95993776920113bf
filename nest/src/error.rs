//! Error types for the nest transformation and its front ends.
//!
//! - [`NestError`] - Grouping engine errors (caller input only)
//! - [`DecodeError`] - Input decoding errors
//! - [`ConfigError`] - Server configuration errors
//! - [`CliError`] - Top-level errors of the `nest` binary
//! - [`ServerError`] - Top-level errors of the `nest-server` binary
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Grouping Engine Errors
// =============================================================================

/// Errors raised by the grouping engine.
///
/// Every variant carries a `detail` and a `reason` so front ends can format
/// them uniformly (`nest: <detail>: <reason>` on the CLI, `<detail>:<reason>`
/// over HTTP).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NestError {
    /// No nesting levels were requested.
    #[error("[]: empty nesting levels")]
    EmptyNestingLevels,

    /// A record lacks one of the requested nesting levels.
    #[error("{field}: no such nesting level")]
    MissingField { field: String },

    /// The recursive strategy went deeper than its limit.
    #[error("{limit}: recursion depth limit exceeded")]
    RecursionLimit { limit: usize },

    /// The tree is deeper than its serializers can handle.
    #[error("{depth}: exceeds maximum output depth")]
    TooDeep { depth: usize, max: usize },
}

impl NestError {
    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// The offending value: the field name, a depth, or `[]`.
    pub fn detail(&self) -> String {
        match self {
            Self::EmptyNestingLevels => "[]".to_string(),
            Self::MissingField { field } => field.clone(),
            Self::RecursionLimit { limit } => limit.to_string(),
            Self::TooDeep { depth, .. } => depth.to_string(),
        }
    }

    /// Human-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyNestingLevels => "empty nesting levels",
            Self::MissingField { .. } => "no such nesting level",
            Self::RecursionLimit { .. } => "recursion depth limit exceeded",
            Self::TooDeep { .. } => "exceeds maximum output depth",
        }
    }
}

// =============================================================================
// Decoding Errors
// =============================================================================

/// Errors while reading and decoding flat records.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Failed to read the input stream.
    #[error("{0}: failed to read input")]
    Io(#[from] std::io::Error),

    /// Input is not a JSON array of objects.
    #[error("{0}: incorrect format of flat dictionaries")]
    Format(#[from] serde_json::Error),
}

impl DecodeError {
    pub fn detail(&self) -> String {
        match self {
            Self::Io(e) => e.to_string(),
            Self::Format(e) => e.to_string(),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Io(_) => "failed to read input",
            Self::Format(_) => "incorrect format of flat dictionaries",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("Missing {0} environment variable")]
    MissingVar(&'static str),

    /// Environment variable is set but empty.
    #[error("{0} must not be empty")]
    EmptyVar(&'static str),

    /// Bind address could not be parsed.
    #[error("Invalid bind address '{address}': {message}")]
    InvalidAddress { address: String, message: String },
}

// =============================================================================
// CLI Errors (top-level)
// =============================================================================

/// Errors surfaced by the `nest` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Grouping failed.
    #[error(transparent)]
    Nest(#[from] NestError),

    /// The result could not be serialized.
    #[error("{0}: failed to serialize result")]
    Encode(serde_json::Error),
}

impl CliError {
    pub fn detail(&self) -> String {
        match self {
            Self::Decode(e) => e.detail(),
            Self::Nest(e) => e.detail(),
            Self::Encode(e) => e.to_string(),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Decode(e) => e.reason(),
            Self::Nest(e) => e.reason(),
            Self::Encode(_) => "failed to serialize result",
        }
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Socket error.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for grouping operations.
pub type NestResult<T> = Result<T, NestError>;

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
