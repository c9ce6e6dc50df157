//! Zoo Keeper: shell error types.

use thiserror::Error;
use zookeeper_core::error::DomainError;

/// Startup and runtime errors for the shell.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A localization catalogue could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A domain operation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
