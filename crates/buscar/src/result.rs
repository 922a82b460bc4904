//! Result and error types for Buscar.

use thiserror::Error;

/// Result type for Buscar operations
pub type BuscarResult<T> = Result<T, BuscarError>;

/// Errors that can occur in Buscar
#[derive(Debug, Error)]
pub enum BuscarError {
    /// No element satisfies a semantic query, or label resolution ran out of strategies
    #[error("Unable to find {kind} by {text:?}: {reason}")]
    Resolution {
        /// Semantic query kind (e.g. "input by label text")
        kind: String,
        /// Literal search text
        text: String,
        /// Why resolution failed
        reason: String,
    },

    /// A chaining or consuming operation ran against an empty locator context
    #[error(
        "No element has been selected for {operation:?}.\n\nAdd a preceding step like \"When I find element by ...\""
    )]
    Precondition {
        /// The operation that needed a subject
        operation: String,
    },

    /// The page driver reported a failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Step text matched no registered pattern
    #[error("No step matches {text:?}")]
    UnknownStep {
        /// The step text
        text: String,
    },

    /// Malformed options table
    #[error("Invalid options: {message}")]
    InvalidOptions {
        /// Error message
        message: String,
    },

    /// Assertion step failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl BuscarError {
    /// Create a resolution error
    #[must_use]
    pub fn resolution(
        kind: impl Into<String>,
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Resolution {
            kind: kind.into(),
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a precondition error
    #[must_use]
    pub fn precondition(operation: impl Into<String>) -> Self {
        Self::Precondition {
            operation: operation.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an invalid options error
    #[must_use]
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a resolution failure
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }

    /// Whether this error is an empty-context precondition failure
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}
