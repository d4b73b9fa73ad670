//! Provisioning policy shared by certificate writers.
//!
//! Drives the read / create-or-update state machine:
//!
//! ```text
//! unknown --read--> found ----valid----> done (unchanged)
//!            |        `----stale------> overwrite --> updated
//!            `--> not-found --write--> created
//!                               `--already-exists--> read again
//! ```
//!
//! Writers supply the transition actions through [`CertReadWriter`]; whether a
//! found bundle is acceptable is decided by a pluggable [`BundleValidator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Instrument};

use super::artifacts::ArtifactBundle;
use super::error::{CertWriterError, Result};

/// Per-call inputs of one provisioning run.
///
/// Passed explicitly to every operation so a single writer can serve concurrent
/// calls for different DNS names or modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub dns_name: String,
    pub dry_run: bool,
}

impl ProvisionRequest {
    pub fn new(dns_name: impl Into<String>, dry_run: bool) -> Self {
        Self { dns_name: dns_name.into(), dry_run }
    }
}

/// Outcome of [`CertWriter::ensure_cert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub bundle: ArtifactBundle,
    /// True when a bundle was created or replaced during the call.
    pub updated: bool,
}

/// Reference to an object that should own the certificate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

/// Transition actions of the provisioning state machine.
#[async_trait]
pub trait CertReadWriter: Send + Sync {
    /// Fetch the persisted bundle.
    ///
    /// `Ok(None)` means the record exists without any data. A missing record is
    /// reported as `CertWriterError::NotFound`.
    async fn read(&self, request: &ProvisionRequest) -> Result<Option<ArtifactBundle>>;

    /// Generate and create a new record.
    ///
    /// Fails with `CertWriterError::AlreadyExists` when another writer created
    /// the record first.
    async fn write(&self, request: &ProvisionRequest) -> Result<ArtifactBundle>;

    /// Generate and replace the record.
    async fn overwrite(&self, request: &ProvisionRequest) -> Result<ArtifactBundle>;
}

/// Pluggable certificate writer.
#[async_trait]
pub trait CertWriter: Send + Sync {
    /// Make sure a usable bundle for `dns_name` exists, creating or replacing it
    /// as needed. With `dry_run` set, the would-be record is rendered instead of
    /// persisted.
    async fn ensure_cert(&self, dns_name: &str, dry_run: bool) -> Result<Provisioned>;

    /// Attach owner references to the certificate record.
    fn inject(&self, owners: &[ObjectReference]) -> Result<()>;
}

/// Decides whether a found bundle may be reused for a DNS name.
pub trait BundleValidator: Send + Sync + std::fmt::Debug {
    fn is_valid(&self, bundle: &ArtifactBundle, dns_name: &str) -> bool;
}

/// Accepts any bundle whose three artifacts are non-empty.
///
/// Does not parse certificates or check expiry.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl BundleValidator for StructuralValidator {
    fn is_valid(&self, bundle: &ArtifactBundle, _dns_name: &str) -> bool {
        !bundle.has_empty_field()
    }
}

/// Run the provisioning state machine against `rw`.
pub async fn ensure_cert<W>(
    rw: &W,
    validator: &dyn BundleValidator,
    request: &ProvisionRequest,
) -> Result<Provisioned>
where
    W: CertReadWriter + ?Sized,
{
    if request.dns_name.trim().is_empty() {
        return Err(CertWriterError::config("dns name cannot be empty"));
    }

    let span = crate::cert_span!("ensure_cert", request.dns_name, dry_run = request.dry_run);
    async move {
        let (current, mut updated) = create_if_not_exists(rw, request).await?;

        let bundle = match current {
            Some(bundle) if validator.is_valid(&bundle, &request.dns_name) => bundle,
            _ => {
                info!("Certificate bundle is missing or invalid, regenerating");
                updated = true;
                rw.overwrite(request).await?
            }
        };

        debug!(updated, "Certificate provisioning finished");
        Ok(Provisioned { bundle, updated })
    }
    .instrument(span)
    .await
}

async fn create_if_not_exists<W>(
    rw: &W,
    request: &ProvisionRequest,
) -> Result<(Option<ArtifactBundle>, bool)>
where
    W: CertReadWriter + ?Sized,
{
    match rw.read(request).await {
        Ok(bundle) => Ok((bundle, false)),
        Err(e) if e.is_not_found() => match rw.write(request).await {
            Ok(bundle) => Ok((Some(bundle), true)),
            Err(e) if e.is_already_exists() => {
                warn!("Certificate record was created concurrently, re-reading");
                Ok((rw.read(request).await?, true))
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}
