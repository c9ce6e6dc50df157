//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Screens never let these escape to the host: every call site either
/// falls back to a default or logs and continues.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A game identifier that is not part of the catalogue.
    #[error("unknown game: {0}")]
    UnknownGame(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
