//! Self-signed generator backed by `rcgen`.

use async_trait::async_trait;
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::CertificateGenerator;
use crate::certs::artifacts::ArtifactBundle;
use crate::certs::error::GeneratorError;

const DEFAULT_CA_COMMON_NAME: &str = "webhook-cert-ca";

/// DNS name a cluster service answers on: `{name}.{namespace}.svc`.
pub fn service_dns_name(namespace: &str, name: &str) -> String {
    format!("{}.{}.svc", name, namespace)
}

/// Generates a fresh CA on every call and signs a serving certificate with it.
///
/// Keys are ECDSA P-256. The CA private key is discarded after signing.
#[derive(Debug, Clone)]
pub struct SelfSignedGenerator {
    ca_common_name: String,
    ca_validity: Duration,
    cert_validity: Duration,
}

impl Default for SelfSignedGenerator {
    fn default() -> Self {
        Self {
            ca_common_name: DEFAULT_CA_COMMON_NAME.to_string(),
            ca_validity: Duration::days(3650),
            cert_validity: Duration::days(365),
        }
    }
}

impl SelfSignedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common name placed on the generated CA.
    pub fn with_ca_common_name(mut self, common_name: impl Into<String>) -> Self {
        self.ca_common_name = common_name.into();
        self
    }

    /// Validity of the serving certificate.
    pub fn with_cert_validity(mut self, validity: Duration) -> Self {
        self.cert_validity = validity;
        self
    }

    /// Validity of the CA certificate.
    pub fn with_ca_validity(mut self, validity: Duration) -> Self {
        self.ca_validity = validity;
        self
    }

    fn generate_ca(&self, now: OffsetDateTime) -> Result<(Certificate, KeyPair), GeneratorError> {
        let mut params = CertificateParams::default();
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.distinguished_name.push(DnType::CommonName, self.ca_common_name.as_str());
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
        ];
        params.not_before = now;
        params.not_after = now + self.ca_validity;

        let key_pair = KeyPair::generate()?;
        let cert = params.self_signed(&key_pair)?;

        Ok((cert, key_pair))
    }

    fn generate_bundle(&self, dns_name: &str) -> Result<ArtifactBundle, GeneratorError> {
        if dns_name.trim().is_empty() {
            return Err(GeneratorError::invalid_dns_name(dns_name, "DNS name cannot be empty"));
        }

        let now = OffsetDateTime::now_utc();
        let (ca_cert, ca_key) = self.generate_ca(now)?;

        let mut params = CertificateParams::new(vec![dns_name.to_string()])
            .map_err(|e| GeneratorError::invalid_dns_name(dns_name, e.to_string()))?;
        params.distinguished_name.push(DnType::CommonName, dns_name);
        params.key_usages =
            vec![KeyUsagePurpose::DigitalSignature, KeyUsagePurpose::KeyEncipherment];
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
        params.not_before = now;
        params.not_after = now + self.cert_validity;

        let key_pair = KeyPair::generate()?;
        let cert = params.signed_by(&key_pair, &ca_cert, &ca_key)?;

        debug!(dns_name = %dns_name, "Generated self-signed certificate bundle");

        Ok(ArtifactBundle::new(ca_cert.pem(), cert.pem(), key_pair.serialize_pem()))
    }
}

#[async_trait]
impl CertificateGenerator for SelfSignedGenerator {
    async fn generate(&self, dns_name: &str) -> Result<ArtifactBundle, GeneratorError> {
        self.generate_bundle(dns_name)
    }
}
