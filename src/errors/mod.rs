//! # Error Handling
//!
//! Crate-level error type for the binary surface: configuration loading,
//! logging setup and certificate provisioning failures.

use crate::certs::CertWriterError;

/// Custom result type for certwriter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for certwriter
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Certificate provisioning errors
    #[error(transparent)]
    Certificate(#[from] CertWriterError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Config(errors.to_string())
    }
}
