//! Certificate generator capability.
//!
//! A generator produces a fresh [`ArtifactBundle`] for a DNS name. Writers call it
//! once per `write`/`overwrite` and never cache its output.
//!
//! # Available Generators
//!
//! - **SelfSignedGenerator**: default; mints a throwaway CA and a serving certificate
//! - **MockCertificateGenerator**: deterministic output for tests

mod mock;
mod self_signed;

pub use mock::MockCertificateGenerator;
pub use self_signed::{service_dns_name, SelfSignedGenerator};

use async_trait::async_trait;

use super::artifacts::ArtifactBundle;
use super::error::GeneratorError;

/// Produces certificate bundles for a DNS name.
///
/// Implementations must be `Send + Sync`; a single generator is shared by every
/// call on a writer.
#[async_trait]
pub trait CertificateGenerator: Send + Sync + std::fmt::Debug {
    /// Generate a new CA certificate, serving certificate and serving key for `dns_name`.
    ///
    /// # Errors
    ///
    /// - `GeneratorError::InvalidDnsName` if the name cannot be a certificate subject
    /// - `GeneratorError::Generation` if key or certificate creation fails
    async fn generate(&self, dns_name: &str) -> Result<ArtifactBundle, GeneratorError>;
}
