//! # certwriter
//!
//! Guarantees that a TLS certificate bundle for a webhook server exists in a
//! namespaced record store, generating and persisting one when it is missing
//! or unusable.
//!
//! ## Architecture
//!
//! ```text
//! CertWriter::ensure_cert → provisioning policy → SecretCertWriter → RecordStore
//!                                                        ↓
//!                                               CertificateGenerator
//! ```
//!
//! - [`certs`]: bundles, records, stores, generators and the writer itself
//! - [`config`]: environment-driven settings for the binary
//! - [`cli`]: the `certwriter` command line
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use certwriter::certs::{
//!     CertWriter, InMemoryRecordStore, RecordIdentifier, SecretCertWriter, WriterConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> certwriter::Result<()> {
//!     let writer = SecretCertWriter::new(
//!         WriterConfig::new()
//!             .with_store(Arc::new(InMemoryRecordStore::new()))
//!             .with_identifier(RecordIdentifier::new("ns", "webhook-cert")),
//!     )?;
//!
//!     let provisioned = writer.ensure_cert("webhook-service.ns.svc", false).await?;
//!     println!("updated: {}", provisioned.updated);
//!     Ok(())
//! }
//! ```

pub mod certs;
pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;

// Re-export commonly used types and traits
pub use certs::{CertWriter, SecretCertWriter, WriterConfig};
pub use config::WriterSettings;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
