//! Error types for certificate provisioning.
//!
//! Only two store conditions carry policy here: a missing record and a create
//! that lost a race. Everything else passes through untouched so callers can
//! apply their own retry and backoff.

use thiserror::Error;

use super::record::RecordIdentifier;
use super::render::RenderError;

/// Result type for certificate writer operations.
pub type Result<T> = std::result::Result<T, CertWriterError>;

/// Errors reported by a [`RecordStore`](super::store::RecordStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists at the identifier.
    #[error("Record not found: {identifier}")]
    NotFound { identifier: RecordIdentifier },

    /// A record already exists at the identifier.
    #[error("Record already exists: {identifier}")]
    AlreadyExists { identifier: RecordIdentifier },

    /// Stored content could not be decoded.
    #[error("Corrupt record {identifier}: {source}")]
    Corrupt {
        identifier: RecordIdentifier,
        #[source]
        source: RenderError,
    },

    /// The record could not be encoded for storage.
    #[error("Failed to encode record {identifier}: {source}")]
    Encode {
        identifier: RecordIdentifier,
        #[source]
        source: RenderError,
    },

    /// Backend-specific failure.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(identifier: &RecordIdentifier) -> Self {
        Self::NotFound { identifier: identifier.clone() }
    }

    pub fn already_exists(identifier: &RecordIdentifier) -> Self {
        Self::AlreadyExists { identifier: identifier.clone() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }
}

/// Errors reported by a [`CertificateGenerator`](super::generator::CertificateGenerator).
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The requested DNS name cannot be used as a certificate subject.
    #[error("Invalid DNS name '{dns_name}': {reason}")]
    InvalidDnsName { dns_name: String, reason: String },

    /// Key or certificate generation failed.
    #[error("Certificate generation failed: {message}")]
    Generation { message: String },

    /// Backend-specific failure (remote PKI, test doubles).
    #[error("Generator backend error: {message}")]
    Backend { message: String },
}

impl GeneratorError {
    pub fn invalid_dns_name(dns_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDnsName { dns_name: dns_name.into(), reason: reason.into() }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation { message: message.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }
}

impl From<rcgen::Error> for GeneratorError {
    fn from(err: rcgen::Error) -> Self {
        Self::generation(err.to_string())
    }
}

/// Errors surfaced by certificate writers and the provisioning policy.
#[derive(Error, Debug)]
pub enum CertWriterError {
    /// Missing or invalid construction fields.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// No record exists; the caller should create one.
    #[error("Certificate record not found: {namespace}/{name}")]
    NotFound { namespace: String, name: String },

    /// Another writer created the record first; the caller should re-read.
    #[error("Certificate record already exists: {namespace}/{name}")]
    AlreadyExists { namespace: String, name: String },

    /// The generator failed.
    #[error(transparent)]
    Generation(#[from] GeneratorError),

    /// Any other store failure, unmodified.
    #[error(transparent)]
    Store(StoreError),

    /// Dry-run rendering failed.
    #[error("Dry-run rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Writing the dry-run rendering to the sink failed.
    #[error("Dry-run output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CertWriterError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn not_found(identifier: &RecordIdentifier) -> Self {
        Self::NotFound { namespace: identifier.namespace.clone(), name: identifier.name.clone() }
    }

    pub fn already_exists(identifier: &RecordIdentifier) -> Self {
        Self::AlreadyExists {
            namespace: identifier.namespace.clone(),
            name: identifier.name.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

impl From<StoreError> for CertWriterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { identifier } => Self::not_found(&identifier),
            StoreError::AlreadyExists { identifier } => Self::already_exists(&identifier),
            other => Self::Store(other),
        }
    }
}
