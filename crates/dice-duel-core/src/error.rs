//! Error types for the fairness engine.

use thiserror::Error;

/// Errors from malformed dice input. Always recoverable; carries the
/// offending 1-based die position and token so callers can surface it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least 3 dice configurations required, got {given}")]
    TooFewDice { given: usize },

    #[error("dice {die} must have exactly 6 faces, got {got}")]
    WrongFaceCount { die: usize, got: usize },

    #[error("invalid number '{token}' in dice {die}")]
    InvalidFace { die: usize, token: String },

    #[error("die index {index} out of range for a set of {len} dice")]
    DieIndexOutOfRange { index: usize, len: usize },
}

/// Errors from the fairness engine proper.
///
/// `VerificationFailed` is deliberately distinct from validation: it means
/// a revealed secret/key pair does not match its digest, so the round is
/// compromised and must abort rather than continue.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("commitment verification failed: revealed value and key do not match the digest")]
    VerificationFailed,

    /// The secure random source failed. Fatal to the operation in progress;
    /// the caller owns any retry policy.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
