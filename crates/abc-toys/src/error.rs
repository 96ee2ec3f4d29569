//! Error type and result alias shared by every module.

use thiserror::Error;

/// Result type alias using [`ToyError`].
pub type ToyResult<T> = std::result::Result<T, ToyError>;

/// Failure modes of the computational modules.
///
/// Every error is deterministic in its inputs; nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ToyError {
    /// An argument is outside the domain of the construction (non-prime `p`,
    /// `q` not p-adically small, zero denominator, degenerate projective
    /// point, degree out of range).
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// No real solution exists for a sample, e.g. `y² < 0` during point
    /// search. Point search skips the sample rather than failing.
    #[error("DomainError: {0}")]
    DomainError(String),

    /// A bounded integer or floating-point computation left its range.
    #[error("ArithmeticOverflow: {0}")]
    ArithmeticOverflow(String),

    /// Configuration document could not be parsed.
    #[error("ConfigError: {0}")]
    Config(#[from] serde_json::Error),
}

impl ToyError {
    /// Create a new `InvalidParameter`.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `DomainError`.
    pub fn domain<S: Into<String>>(msg: S) -> Self {
        Self::DomainError(msg.into())
    }

    /// Create a new `ArithmeticOverflow`.
    pub fn overflow<S: Into<String>>(msg: S) -> Self {
        Self::ArithmeticOverflow(msg.into())
    }

    /// Returns true for errors that callers may treat as "no result here"
    /// instead of a failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DomainError(_))
    }
}
