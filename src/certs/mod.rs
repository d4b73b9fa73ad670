//! Certificate provisioning into namespaced records.
//!
//! This module guarantees that a TLS bundle (CA certificate, serving certificate,
//! serving key) exists in a record addressed by namespace + name, regenerating it
//! when missing or unusable. In dry-run mode the would-be record is rendered as
//! YAML instead of persisted.
//!
//! # Architecture
//!
//! - [`RecordStore`]: key/value backend (`get`, `create`, `update`)
//! - [`CertificateGenerator`]: produces a fresh [`ArtifactBundle`] for a DNS name
//! - [`SecretCertWriter`]: translates bundles to records and implements the
//!   read / write / overwrite transitions
//! - [`provision::ensure_cert`]: the state machine that decides which transition to run
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use certwriter::certs::{
//!     CertWriter, FileRecordStore, RecordIdentifier, SecretCertWriter, WriterConfig,
//! };
//!
//! let writer = SecretCertWriter::new(
//!     WriterConfig::new()
//!         .with_store(Arc::new(FileRecordStore::new("/var/lib/certwriter")))
//!         .with_identifier(RecordIdentifier::new("ns", "webhook-cert")),
//! )?;
//!
//! let provisioned = writer.ensure_cert("webhook-service.ns.svc", false).await?;
//! if provisioned.updated {
//!     // push provisioned.bundle.ca_cert() into the webhook configuration
//! }
//! ```

pub mod artifacts;
pub mod error;
pub mod generator;
pub mod provision;
pub mod record;
pub mod render;
pub mod store;
pub mod writer;

pub use artifacts::{ArtifactBundle, CA_CERT_NAME, SERVER_CERT_NAME, SERVER_KEY_NAME};
pub use error::{CertWriterError, GeneratorError, Result, StoreError};
pub use generator::{
    service_dns_name, CertificateGenerator, MockCertificateGenerator, SelfSignedGenerator,
};
pub use provision::{
    BundleValidator, CertReadWriter, CertWriter, ObjectReference, ProvisionRequest, Provisioned,
    StructuralValidator,
};
pub use record::{bundle_to_record, record_to_bundle, Record, RecordData, RecordIdentifier};
pub use render::{parse_rendered_record, render_record, RenderError};
pub use store::{FileRecordStore, InMemoryRecordStore, RecordStore};
pub use writer::{DryRunSink, SecretCertWriter, WriterConfig};
