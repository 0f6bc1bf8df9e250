//! Error types shared by the core and client adapters.

use thiserror::Error;

/// A value failed validation at construction time.
///
/// Values that fail validation are never stored in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Method is blank or contains something other than upper-case ASCII letters
    #[error("invalid HTTP method '{0}': expected upper-case letters only")]
    InvalidMethod(String),
    /// Path is blank or does not start with '/'
    #[error("invalid path '{0}': expected a non-blank path starting with '/'")]
    InvalidPath(String),
    /// Status code outside 100..=599
    #[error("invalid status code {0}: expected a value in 100..=599")]
    InvalidStatus(i64),
    /// Negative simulated delay
    #[error("invalid delay {0}ms: delay must not be negative")]
    NegativeDelay(i64),
}

/// An adapter could not synthesize a native response.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to build mocked response: {0}")]
    Build(String),
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}
